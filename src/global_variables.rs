// Default arrival rate (vehicles per minute at each approach, before the turn split)
pub const DEFAULT_ARRIVAL_RATE: f64 = 10.0;

// Signal timing (seconds)
pub const DEFAULT_GREEN_SECS: f64 = 30.0;
pub const DEFAULT_GREEN_ARROW_SECS: f64 = 10.0;
pub const DEFAULT_CHANGE_LAG_SECS: f64 = 2.0;

// Driver population: means and standard deviations
pub const DEFAULT_ACCELERATION_MEAN: f64 = 1.3; // m/s^2
pub const DEFAULT_ACCELERATION_SD: f64 = 0.1;
pub const DEFAULT_TOP_SPEED_MEAN: f64 = 20.0; // m/s, roughly 45 mph
pub const DEFAULT_TOP_SPEED_SD: f64 = 1.33;
pub const DEFAULT_FOLLOW_GAP_MEAN: f64 = 1.5; // seconds behind the car in front
pub const DEFAULT_FOLLOW_GAP_SD: f64 = 0.2;
pub const DEFAULT_REACTION_MEAN: f64 = 0.5;
pub const DEFAULT_FIRST_CAR_REACTION_MEAN: f64 = 1.0;

// Proportion turning left, going straight, turning right
pub const DEFAULT_LEFT_TURN_PROPORTION: f64 = 0.1;
pub const DEFAULT_STRAIGHT_PROPORTION: f64 = 0.8;
pub const DEFAULT_RIGHT_TURN_PROPORTION: f64 = 0.1;

// Seconds of clear road needed before turning across traffic
pub const DEFAULT_SAFE_TURNING_GAP: f64 = 3.0;

pub const DEFAULT_TICK_SECS: f64 = 0.1;
// 4.5 m of car plus a 2 m standing gap
pub const DEFAULT_CAR_LENGTH: f64 = 6.5;
// Meters from the stop line where vehicles appear
pub const DEFAULT_SPAWN_DISTANCE: f64 = 100.0;

// Braking vehicles come to rest this far before the stop line
pub const HOLD_POINT: f64 = 1.0;

// Tolerance for light countdowns reaching zero
pub const TIME_EPSILON: f64 = 1e-9;
