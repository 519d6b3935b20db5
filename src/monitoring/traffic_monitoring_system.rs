use crate::shared_data::{CompletedVehicleRecord, IntersectionSnapshot};
use crate::simulation_engine::intersections::CompletedVehicle;
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Generic helper to write a batch of records to a fresh CSV file.
fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every completed vehicle that arrived at or after `warm_up` seconds
/// to a CSV file. Returns the number of rows written.
pub fn export_completed_vehicles<P: AsRef<Path>>(
    path: P,
    completed: &[CompletedVehicle],
    warm_up: f64,
) -> Result<usize, Box<dyn Error>> {
    let records: Vec<CompletedVehicleRecord> = completed
        .iter()
        .filter(|c| c.arrival_time() >= warm_up)
        .map(CompletedVehicleRecord::from)
        .collect();
    write_csv(&path, &records)?;
    log::info!(
        "Exported {} of {} completed vehicles to {}",
        records.len(),
        completed.len(),
        path.as_ref().display()
    );
    Ok(records.len())
}

/// Dumps a snapshot as pretty-printed JSON.
pub fn write_snapshot_json<P: AsRef<Path>>(
    path: P,
    snapshot: &IntersectionSnapshot,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    Ok(())
}

/// Logs a one-line status per lane.
pub fn log_snapshot(snapshot: &IntersectionSnapshot) {
    log::info!(
        "t={:.1}s: {} generated, {} completed, {} queued",
        snapshot.clock,
        snapshot.generated,
        snapshot.completed,
        snapshot.queued()
    );
    for lane in &snapshot.lanes {
        match lane.head_location {
            Some(head) => log::info!(
                "  {:?} {:?}: {:?} ({:.1}s left), {} vehicles, head at {:.1}m",
                lane.orientation,
                lane.lane_type,
                lane.light,
                lane.time_to_change,
                lane.vehicle_count,
                head
            ),
            None => log::info!(
                "  {:?} {:?}: {:?} ({:.1}s left), empty",
                lane.orientation,
                lane.lane_type,
                lane.light,
                lane.time_to_change
            ),
        }
    }
}
