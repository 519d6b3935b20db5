use crate::control_system::traffic_light_controller::SignalTimings;
use crate::global_variables::*;
use crate::simulation_engine::config_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Share of arriving vehicles by movement. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnProportions {
    pub left: f64,
    pub straight: f64,
    pub right: f64,
}

impl Default for TurnProportions {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT_TURN_PROPORTION,
            straight: DEFAULT_STRAIGHT_PROPORTION,
            right: DEFAULT_RIGHT_TURN_PROPORTION,
        }
    }
}

impl TurnProportions {
    /// Probability that a vehicle in a through lane goes straight rather than turning right.
    pub fn straight_share_of_through(&self) -> f64 {
        self.straight / (self.straight + self.right)
    }
}

/// Every tunable constant of one simulation run.
///
/// Missing fields in a scenario file fall back to the defaults in
/// `global_variables`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Vehicles per minute at each approach, before the turn split.
    pub arrival_rate: f64,
    pub green_secs: f64,
    pub green_arrow_secs: f64,
    /// All-red time between phases.
    pub change_lag_secs: f64,
    pub acceleration_mean: f64,
    pub acceleration_sd: f64,
    pub top_speed_mean: f64,
    pub top_speed_sd: f64,
    pub follow_gap_mean: f64,
    pub follow_gap_sd: f64,
    pub reaction_mean: f64,
    /// Reaction mean for the car waiting at the very front when its light turns green.
    pub first_car_reaction_mean: f64,
    pub turn_proportions: TurnProportions,
    pub safe_turning_gap: f64,
    pub tick_secs: f64,
    pub car_length: f64,
    pub spawn_distance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arrival_rate: DEFAULT_ARRIVAL_RATE,
            green_secs: DEFAULT_GREEN_SECS,
            green_arrow_secs: DEFAULT_GREEN_ARROW_SECS,
            change_lag_secs: DEFAULT_CHANGE_LAG_SECS,
            acceleration_mean: DEFAULT_ACCELERATION_MEAN,
            acceleration_sd: DEFAULT_ACCELERATION_SD,
            top_speed_mean: DEFAULT_TOP_SPEED_MEAN,
            top_speed_sd: DEFAULT_TOP_SPEED_SD,
            follow_gap_mean: DEFAULT_FOLLOW_GAP_MEAN,
            follow_gap_sd: DEFAULT_FOLLOW_GAP_SD,
            reaction_mean: DEFAULT_REACTION_MEAN,
            first_car_reaction_mean: DEFAULT_FIRST_CAR_REACTION_MEAN,
            turn_proportions: TurnProportions::default(),
            safe_turning_gap: DEFAULT_SAFE_TURNING_GAP,
            tick_secs: DEFAULT_TICK_SECS,
            car_length: DEFAULT_CAR_LENGTH,
            spawn_distance: DEFAULT_SPAWN_DISTANCE,
        }
    }
}

impl SimulationConfig {
    /// Loads a config from a JSON file and validates it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_arrival_rate(mut self, arrival_rate: f64) -> Self {
        self.arrival_rate = arrival_rate;
        self
    }

    pub fn with_signal_timing(mut self, green_secs: f64, green_arrow_secs: f64) -> Self {
        self.green_secs = green_secs;
        self.green_arrow_secs = green_arrow_secs;
        self
    }

    pub fn signal_timings(&self) -> SignalTimings {
        SignalTimings {
            green: self.green_secs,
            green_arrow: self.green_arrow_secs,
            change_lag: self.change_lag_secs,
        }
    }

    fn non_negative_fields(&self) -> [(&'static str, f64); 16] {
        [
            ("arrival_rate", self.arrival_rate),
            ("green_secs", self.green_secs),
            ("green_arrow_secs", self.green_arrow_secs),
            ("change_lag_secs", self.change_lag_secs),
            ("acceleration_mean", self.acceleration_mean),
            ("acceleration_sd", self.acceleration_sd),
            ("top_speed_mean", self.top_speed_mean),
            ("top_speed_sd", self.top_speed_sd),
            ("follow_gap_mean", self.follow_gap_mean),
            ("follow_gap_sd", self.follow_gap_sd),
            ("reaction_mean", self.reaction_mean),
            ("first_car_reaction_mean", self.first_car_reaction_mean),
            ("safe_turning_gap", self.safe_turning_gap),
            ("car_length", self.car_length),
            ("spawn_distance", self.spawn_distance),
            ("tick_secs", self.tick_secs),
        ]
    }

    /// Rejects configurations the simulation cannot run on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.non_negative_fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.tick_secs <= 0.0 {
            return Err(ConfigError::NonPositiveTickDuration(self.tick_secs));
        }

        let turns = &self.turn_proportions;
        for (field, value) in [
            ("turn_proportions.left", turns.left),
            ("turn_proportions.straight", turns.straight),
            ("turn_proportions.right", turns.right),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        let sum = turns.left + turns.straight + turns.right;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::TurnProportions { sum });
        }
        if turns.left >= 1.0 {
            return Err(ConfigError::LeftTurnProportion(turns.left));
        }
        Ok(())
    }
}
