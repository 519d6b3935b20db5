// ---------------------------------------------------------------------------
// ConfigError: rejected simulation configurations
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors raised while loading or validating a `SimulationConfig`.
///
/// Construction fails fast with one of these instead of clamping a bad value
/// and letting the run go on with numbers nobody asked for.
#[derive(Debug)]
pub enum ConfigError {
    /// The scenario file could not be read.
    Io(std::io::Error),
    /// The scenario file is not valid JSON for a config.
    Parse(String),
    /// Left + straight + right turn proportions do not add up to 1.
    TurnProportions { sum: f64 },
    /// Left-turn proportion outside [0, 1).
    LeftTurnProportion(f64),
    /// A rate, duration or physical constant is negative.
    Negative { field: &'static str, value: f64 },
    /// A parameter is NaN or infinite.
    NonFinite { field: &'static str },
    /// The tick duration must be strictly positive.
    NonPositiveTickDuration(f64),
    /// A sampling distribution rejected its parameters.
    Distribution { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Parse(msg) => write!(f, "Invalid config file: {msg}"),
            ConfigError::TurnProportions { sum } => {
                write!(f, "Turn proportions must sum to 1, got {sum}")
            }
            ConfigError::LeftTurnProportion(value) => {
                write!(f, "Left-turn proportion must be in [0, 1), got {value}")
            }
            ConfigError::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            ConfigError::NonFinite { field } => write!(f, "{field} must be a finite number"),
            ConfigError::NonPositiveTickDuration(value) => {
                write!(f, "Tick duration must be positive, got {value}")
            }
            ConfigError::Distribution { field, reason } => {
                write!(f, "Cannot sample {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
