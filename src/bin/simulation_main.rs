// simulation_main.rs
use intersection_sim::monitoring::{export_completed_vehicles, log_snapshot};
use intersection_sim::{Intersection, SimulationConfig};
use serde::Deserialize;
use std::error::Error;
use std::fs;

/// How long to run and where the results go.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunSettings {
    minutes: f64,
    /// Vehicles arriving before this are left out of the export.
    warm_up_minutes: f64,
    seed: u64,
    output: String,
    status_every_minutes: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            minutes: 65.0,
            warm_up_minutes: 5.0,
            seed: 42,
            output: "completed_vehicles.csv".to_string(),
            status_every_minutes: 5.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    config: SimulationConfig,
    run: RunSettings,
}

fn load_scenario(path: Option<String>) -> Result<Scenario, Box<dyn Error>> {
    match path {
        Some(path) => {
            log::info!("Loading scenario from {}", path);
            let text = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => {
            log::info!("No scenario file given, using defaults");
            Ok(Scenario::default())
        }
    }
}

fn ticks_for(minutes: f64, tick_secs: f64) -> u64 {
    (minutes * 60.0 / tick_secs).round().max(0.0) as u64
}

fn run() -> Result<(), Box<dyn Error>> {
    let scenario = load_scenario(std::env::args().nth(1))?;
    let run = scenario.run;
    let mut intersection = Intersection::seeded(scenario.config, run.seed)?;
    let tick_secs = intersection.config().tick_secs;

    let total_ticks = ticks_for(run.minutes, tick_secs);
    let status_ticks = ticks_for(run.status_every_minutes, tick_secs).max(1);
    let mut done = 0;
    while done < total_ticks {
        let batch = status_ticks.min(total_ticks - done);
        intersection.run(batch);
        done += batch;
        log_snapshot(&intersection.snapshot());
    }

    export_completed_vehicles(
        &run.output,
        intersection.completed(),
        run.warm_up_minutes * 60.0,
    )?;
    log::info!(
        "Simulated {:.1} minutes: {} vehicles generated, {} completed, {} still queued",
        intersection.clock() / 60.0,
        intersection.generated(),
        intersection.completed().len(),
        intersection.queued()
    );
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("Simulation failed: {}", e);
        eprintln!("Simulation error: {}", e);
        std::process::exit(1);
    }
}
