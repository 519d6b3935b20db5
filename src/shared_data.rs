// src/shared_data.rs

use crate::control_system::traffic_light_controller::LightState;
use crate::simulation_engine::intersections::CompletedVehicle;
use crate::simulation_engine::lanes::{LaneId, LaneType, Orientation};
use crate::simulation_engine::vehicles::Intention;
use serde::{Deserialize, Serialize};

/// Diagnostic view of one lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub lane: LaneId,
    pub orientation: Orientation,
    pub lane_type: LaneType,
    pub light: LightState,
    pub time_to_change: f64,
    pub vehicle_count: usize,
    /// Distance of the head vehicle to the stop line, if any.
    pub head_location: Option<f64>,
}

/// Diagnostic view of the whole intersection at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionSnapshot {
    pub clock: f64,
    pub ticks: u64,
    pub generated: u64,
    pub completed: usize,
    pub lanes: Vec<LaneSnapshot>,
}

impl IntersectionSnapshot {
    /// Vehicles still queued across all lanes.
    pub fn queued(&self) -> usize {
        self.lanes.iter().map(|lane| lane.vehicle_count).sum()
    }
}

/// One completed vehicle, flattened for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedVehicleRecord {
    pub orientation: Orientation,
    pub lane_type: LaneType,
    pub vehicle_id: u64,
    pub intention: Intention,
    pub arrival_time: f64,
    pub departure_time: f64,
    pub duration: f64,
}

impl From<&CompletedVehicle> for CompletedVehicleRecord {
    fn from(completed: &CompletedVehicle) -> Self {
        let vehicle = &completed.vehicle;
        Self {
            orientation: completed.orientation,
            lane_type: completed.lane_type,
            vehicle_id: vehicle.id,
            intention: vehicle.intention,
            arrival_time: vehicle.arrival_time,
            departure_time: completed.departure_time(),
            duration: completed.duration(),
        }
    }
}
