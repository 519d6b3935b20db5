pub mod traffic_monitoring_system;

pub use traffic_monitoring_system::{export_completed_vehicles, log_snapshot, write_snapshot_json};
