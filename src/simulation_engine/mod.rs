// simulation_engine/mod.rs
pub mod calibration;
pub mod config;
pub mod config_error;
pub mod intersections;
pub mod lanes;
pub mod vehicles;
