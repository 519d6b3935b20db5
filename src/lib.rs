//! Tick-based simulation of a four-way signalized intersection.
//!
//! Vehicles arrive at each approach as a Poisson process, follow the car in
//! front, wait for their light (or a safe gap in conflicting traffic when
//! turning) and leave once they cross the stop line. An [`Intersection`] is
//! driven by [`Intersection::tick`] / [`Intersection::run`]; completed
//! vehicles and diagnostic snapshots are exposed read-only for whatever
//! aggregates the results.

pub mod control_system;
pub mod global_variables;
pub mod monitoring;
pub mod shared_data;
pub mod simulation_engine;

pub use control_system::traffic_light_controller::LightState;
pub use simulation_engine::config::{SimulationConfig, TurnProportions};
pub use simulation_engine::config_error::ConfigError;
pub use simulation_engine::intersections::{CompletedVehicle, Intersection};
pub use simulation_engine::lanes::{LaneId, LaneType, Orientation};
pub use simulation_engine::vehicles::Intention;
