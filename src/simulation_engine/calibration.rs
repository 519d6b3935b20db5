use crate::simulation_engine::config::SimulationConfig;
use crate::simulation_engine::config_error::ConfigError;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

/// A validated config together with the driver distributions built from it.
///
/// Built once per run and shared read-only by every lane and vehicle.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub config: SimulationConfig,
    top_speed: Normal<f64>,
    acceleration: Normal<f64>,
    follow_gap: Normal<f64>,
    reaction: Exp<f64>,
    first_car_reaction: Exp<f64>,
}

fn normal(field: &'static str, mean: f64, sd: f64) -> Result<Normal<f64>, ConfigError> {
    Normal::new(mean, sd).map_err(|e| ConfigError::Distribution {
        field,
        reason: e.to_string(),
    })
}

// Exponential parameterised by its mean. A zero mean gives an infinite rate, which samples 0.
fn exponential(field: &'static str, mean: f64) -> Result<Exp<f64>, ConfigError> {
    Exp::new(1.0 / mean).map_err(|e| ConfigError::Distribution {
        field,
        reason: e.to_string(),
    })
}

impl Calibration {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            top_speed: normal("top_speed", config.top_speed_mean, config.top_speed_sd)?,
            acceleration: normal(
                "acceleration",
                config.acceleration_mean,
                config.acceleration_sd,
            )?,
            follow_gap: normal("follow_gap", config.follow_gap_mean, config.follow_gap_sd)?,
            reaction: exponential("reaction", config.reaction_mean)?,
            first_car_reaction: exponential(
                "first_car_reaction",
                config.first_car_reaction_mean,
            )?,
            config,
        })
    }

    pub fn tick_secs(&self) -> f64 {
        self.config.tick_secs
    }

    pub fn sample_top_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.top_speed.sample(rng).max(0.0)
    }

    pub fn sample_acceleration<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.acceleration.sample(rng).max(0.0)
    }

    pub fn sample_follow_gap<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.follow_gap.sample(rng).max(0.0)
    }

    pub fn sample_reaction<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.reaction.sample(rng)
    }

    pub fn sample_first_car_reaction<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.first_car_reaction.sample(rng)
    }
}
