use crate::global_variables::TIME_EPSILON;
use crate::simulation_engine::lanes::LaneType;
use serde::{Deserialize, Serialize};

/// The light shown to one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightState {
    Red,
    Green,
    /// Protected left turn.
    GreenArrow,
    /// All-red between the arrow and the permissive green of a left-turn lane.
    RedBetweenArrowAndGreen,
}

impl LightState {
    /// Green or green arrow.
    pub fn is_go(self) -> bool {
        matches!(self, LightState::Green | LightState::GreenArrow)
    }
}

/// Phase durations in seconds, shared by every lane of an intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalTimings {
    pub green: f64,
    pub green_arrow: f64,
    pub change_lag: f64,
}

impl SignalTimings {
    /// Through lanes stay red for the perpendicular green, its arrow and both lags.
    pub fn through_red(&self) -> f64 {
        self.green + 2.0 * self.change_lag + self.green_arrow
    }

    pub fn left_turn_red(&self) -> f64 {
        self.green + self.change_lag
    }

    /// Length of a full through-lane cycle.
    pub fn through_cycle(&self) -> f64 {
        self.green + self.through_red()
    }

    /// Length of a full left-turn-lane cycle.
    pub fn left_turn_cycle(&self) -> f64 {
        2.0 * self.green_arrow + self.change_lag + self.left_turn_red()
    }

    /// The phase that follows `state` on a lane of the given type, with its duration.
    pub fn next_phase(&self, lane_type: LaneType, state: LightState) -> (LightState, f64) {
        match lane_type {
            LaneType::LeftTurn => match state {
                LightState::Red => (LightState::GreenArrow, self.green_arrow),
                LightState::GreenArrow => (LightState::RedBetweenArrowAndGreen, self.change_lag),
                LightState::RedBetweenArrowAndGreen => (LightState::Green, self.green_arrow),
                LightState::Green => (LightState::Red, self.left_turn_red()),
            },
            LaneType::Through => match state {
                LightState::Green => (LightState::Red, self.through_red()),
                // Through lanes only cycle Red/Green; a forced arrow state falls back to green.
                _ => (LightState::Green, self.green),
            },
        }
    }
}

/// Countdown-driven light for a single lane.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLight {
    pub lane_type: LaneType,
    pub state: LightState,
    pub time_to_change: f64,
}

impl TrafficLight {
    pub fn new(lane_type: LaneType, state: LightState, time_to_change: f64) -> Self {
        Self {
            lane_type,
            state,
            time_to_change,
        }
    }

    /// Counts the phase down by `dt` and switches when it runs out.
    /// Returns the new state when a transition happened.
    ///
    /// The next phase's duration is added to whatever is left of the countdown,
    /// so phase boundaries stay on the configured schedule.
    pub fn update(&mut self, dt: f64, timings: &SignalTimings) -> Option<LightState> {
        self.time_to_change -= dt;
        if self.time_to_change > TIME_EPSILON {
            return None;
        }
        let (next, duration) = timings.next_phase(self.lane_type, self.state);
        self.state = next;
        self.time_to_change += duration;
        Some(next)
    }

    /// Overrides the current phase.
    pub fn force(&mut self, state: LightState, time_to_change: f64) {
        self.state = state;
        self.time_to_change = time_to_change;
    }
}
