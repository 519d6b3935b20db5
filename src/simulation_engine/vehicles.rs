use crate::control_system::traffic_light_controller::LightState;
use crate::global_variables::HOLD_POINT;
use crate::simulation_engine::calibration::Calibration;
use crate::simulation_engine::config::SimulationConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a vehicle intends to do at the stop line. Fixed when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intention {
    Straight,
    LeftTurn,
    RightTurn,
}

/// Position and speed of the vehicle directly ahead in the same lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leader {
    pub location: f64,
    pub speed: f64,
}

impl Leader {
    /// Nothing ahead: infinitely far away and infinitely fast.
    pub const OPEN_ROAD: Leader = Leader {
        location: f64::NEG_INFINITY,
        speed: f64::INFINITY,
    };

    pub fn of(vehicle: &Vehicle) -> Self {
        Self {
            location: vehicle.location,
            speed: vehicle.speed,
        }
    }

    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }
}

/// Head-vehicle time-to-stop-line of the lanes a turning vehicle has to yield to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictGaps {
    /// Straight-on traffic from the opposite approach (left turns yield to it).
    pub oncoming_through: f64,
    /// Left turners from the opposite approach (right turns yield to them on their arrow).
    pub oncoming_left_turn: f64,
    /// Through traffic approaching from the driver's left (right turn on red yields to it).
    pub crossing_through: f64,
}

impl ConflictGaps {
    pub const OPEN: ConflictGaps = ConflictGaps {
        oncoming_through: f64::INFINITY,
        oncoming_left_turn: f64::INFINITY,
        crossing_through: f64::INFINITY,
    };
}

/// Everything a vehicle can see of its lane's signal this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub light: LightState,
    pub time_to_change: f64,
    pub conflicts: ConflictGaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Manoeuvre {
    Proceed,
    Brake,
}

fn proceed_if_clear(gap: f64, safe_turning_gap: f64) -> Manoeuvre {
    if gap > safe_turning_gap {
        Manoeuvre::Proceed
    } else {
        Manoeuvre::Brake
    }
}

/// One car approaching the stop line.
///
/// `location` is the distance to the stop line in meters and only ever
/// decreases; the vehicle has cleared the intersection once it drops below 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Arrival sequence number within its lane.
    pub id: u64,
    pub intention: Intention,
    pub location: f64,
    pub speed: f64,
    pub top_speed: f64,
    pub acceleration: f64,
    /// Preferred time gap (seconds) to the vehicle in front.
    pub follow_gap: f64,
    /// Seconds left before a stopped vehicle starts moving.
    pub reaction_remaining: f64,
    pub arrival_time: f64,
    pub departure_time: Option<f64>,
    pub duration: Option<f64>,
}

impl Vehicle {
    /// Creates a vehicle at the spawn point, pushed back behind `leader` if the
    /// spawn point lies inside the leader's safety envelope.
    pub fn new<R: Rng + ?Sized>(
        id: u64,
        leader: Leader,
        intention: Intention,
        arrival_time: f64,
        calibration: &Calibration,
        rng: &mut R,
    ) -> Self {
        let config = &calibration.config;
        let acceleration = calibration.sample_acceleration(rng);
        let top_speed = calibration.sample_top_speed(rng);
        let follow_gap = calibration.sample_follow_gap(rng);
        let reaction_remaining = calibration.sample_reaction(rng);

        let mut vehicle = Self {
            id,
            intention,
            location: config.spawn_distance,
            speed: top_speed,
            top_speed,
            acceleration,
            follow_gap,
            reaction_remaining,
            arrival_time,
            departure_time: None,
            duration: None,
        };

        let safe_distance = vehicle.safe_distance_behind(leader, config);
        if safe_distance > vehicle.location {
            vehicle.location = safe_distance;
            vehicle.speed = leader.speed.min(top_speed).max(0.0);
        }
        vehicle
    }

    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }

    pub fn has_cleared(&self) -> bool {
        self.location < 0.0
    }

    /// Where this vehicle has to stay behind `leader` at its current speed.
    pub fn safe_distance_behind(&self, leader: Leader, config: &SimulationConfig) -> f64 {
        leader.location + config.car_length + self.follow_gap * self.speed
    }

    /// Seconds until the stop line at the current speed, or infinity when stopped.
    pub fn time_to_stop_line(&self) -> f64 {
        if self.is_stationary() {
            f64::INFINITY
        } else {
            self.location / self.speed
        }
    }

    /// Moves the vehicle by one tick.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        leader: Leader,
        signal: &Signal,
        calibration: &Calibration,
        rng: &mut R,
    ) {
        let config = &calibration.config;
        let dt = config.tick_secs;
        let start_location = self.location;

        if self.is_stationary() {
            // Queued right behind a car that hasn't moved either.
            if leader.is_stationary() && leader.location >= self.location - config.car_length {
                return;
            }
            self.reaction_remaining -= dt;
            if self.reaction_remaining > 0.0 {
                return;
            }
            self.reaction_remaining = calibration.sample_reaction(rng);
        }

        match self.manoeuvre(signal, config.safe_turning_gap) {
            Manoeuvre::Proceed => self.accelerate(dt),
            Manoeuvre::Brake => self.brake(dt),
        }

        self.keep_safe_distance(leader, start_location, config);

        debug_assert!(self.speed >= 0.0 && self.speed <= self.top_speed);
        debug_assert!(self.location <= start_location);
    }

    fn manoeuvre(&self, signal: &Signal, safe_turning_gap: f64) -> Manoeuvre {
        let conflicts = &signal.conflicts;
        match (self.intention, signal.light) {
            (Intention::Straight, LightState::Green) => Manoeuvre::Proceed,
            (Intention::Straight, _) => Manoeuvre::Brake,

            (Intention::LeftTurn, LightState::GreenArrow) => Manoeuvre::Proceed,
            (Intention::LeftTurn, LightState::Green) => {
                proceed_if_clear(conflicts.oncoming_through, safe_turning_gap)
            }
            (Intention::LeftTurn, _) => Manoeuvre::Brake,

            (Intention::RightTurn, LightState::Green) => Manoeuvre::Proceed,
            (Intention::RightTurn, LightState::GreenArrow) => {
                proceed_if_clear(conflicts.oncoming_left_turn, safe_turning_gap)
            }
            (Intention::RightTurn, LightState::Red | LightState::RedBetweenArrowAndGreen) => {
                proceed_if_clear(conflicts.crossing_through, safe_turning_gap)
            }
        }
    }

    fn accelerate(&mut self, dt: f64) {
        let start_speed = self.speed;
        self.speed = (self.speed + dt * self.acceleration).min(self.top_speed);
        self.location -= (start_speed + self.speed) / 2.0 * dt;
    }

    /// Constant deceleration that brings the vehicle to rest at the hold point.
    fn brake(&mut self, dt: f64) {
        let distance_to_hold = self.location - HOLD_POINT;
        if distance_to_hold <= 0.0 {
            self.speed = 0.0;
            return;
        }

        let start_speed = self.speed;
        let deceleration = -(start_speed * start_speed) / (2.0 * distance_to_hold);
        self.speed = (start_speed + deceleration * dt).max(0.0);
        let travelled = (start_speed + self.speed) / 2.0 * dt;
        if travelled >= distance_to_hold {
            self.location = HOLD_POINT;
            self.speed = 0.0;
        } else {
            self.location -= travelled;
        }
    }

    fn keep_safe_distance(&mut self, leader: Leader, start_location: f64, config: &SimulationConfig) {
        if self.safe_distance_behind(leader, config) <= self.location {
            return;
        }
        // Match the leader, but never faster than the speed whose safe distance
        // would put us behind where we started this tick.
        let mut speed = leader.speed.min(self.top_speed);
        if self.follow_gap > 0.0 {
            let room = start_location - leader.location - config.car_length;
            speed = speed.min(room / self.follow_gap);
        }
        self.speed = speed.max(0.0);
        self.location = self
            .safe_distance_behind(leader, config)
            .min(start_location);
    }

    /// Stamps the departure. Called exactly once, when the vehicle leaves its lane.
    pub fn depart(&mut self, clock: f64) {
        debug_assert!(self.departure_time.is_none(), "vehicle {} departed twice", self.id);
        self.departure_time = Some(clock);
        self.duration = Some(clock - self.arrival_time);
    }
}
