use crate::control_system::traffic_light_controller::{LightState, SignalTimings, TrafficLight};
use crate::shared_data::IntersectionSnapshot;
use crate::simulation_engine::calibration::Calibration;
use crate::simulation_engine::config::SimulationConfig;
use crate::simulation_engine::config_error::ConfigError;
use crate::simulation_engine::lanes::{ConflictLanes, Lane, LaneId, LaneType, Orientation};
use crate::simulation_engine::vehicles::{Intention, Vehicle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lane types in the order they are laid out for each approach.
const LANE_TYPES: [LaneType; 2] = [LaneType::LeftTurn, LaneType::Through];

/// Position of a lane in the intersection: approaches North, West, South,
/// East, each with its left-turn lane first.
pub fn lane_slot(orientation: Orientation, lane_type: LaneType) -> LaneId {
    let approach = match orientation {
        Orientation::North => 0,
        Orientation::West => 1,
        Orientation::South => 2,
        Orientation::East => 3,
    };
    let kind = match lane_type {
        LaneType::LeftTurn => 0,
        LaneType::Through => 1,
    };
    LaneId(approach * LANE_TYPES.len() + kind)
}

/// Light phase each lane starts in.
///
/// North/South through traffic opens on green while East/West waits out that
/// green plus the all-red lag, so perpendicular through lanes never show
/// green together. Left-turn arrows start red and open once their own
/// approach's through lanes are red.
pub fn initial_light(
    orientation: Orientation,
    lane_type: LaneType,
    timings: &SignalTimings,
) -> TrafficLight {
    let (state, time_to_change) = match (lane_type, orientation.is_north_south()) {
        (LaneType::Through, true) => (LightState::Green, timings.green),
        (LaneType::Through, false) => (LightState::Red, timings.green + timings.change_lag),
        (LaneType::LeftTurn, true) => (
            LightState::Red,
            2.0 * timings.green + timings.change_lag,
        ),
        (LaneType::LeftTurn, false) => (LightState::Red, timings.green + timings.change_lag),
    };
    TrafficLight::new(lane_type, state, time_to_change)
}

/// A vehicle that has cleared the stop line, with the lane it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedVehicle {
    pub lane: LaneId,
    pub orientation: Orientation,
    pub lane_type: LaneType,
    pub vehicle: Vehicle,
}

impl CompletedVehicle {
    fn new(lane: &Lane, vehicle: Vehicle) -> Self {
        Self {
            lane: lane.id,
            orientation: lane.orientation,
            lane_type: lane.lane_type,
            vehicle,
        }
    }

    pub fn intention(&self) -> Intention {
        self.vehicle.intention
    }

    pub fn arrival_time(&self) -> f64 {
        self.vehicle.arrival_time
    }

    // Departure and duration are always stamped before a vehicle gets here.
    pub fn departure_time(&self) -> f64 {
        self.vehicle.departure_time.unwrap_or(f64::NAN)
    }

    pub fn duration(&self) -> f64 {
        self.vehicle.duration.unwrap_or(f64::NAN)
    }
}

/// A four-way signalized intersection: four approaches, each with a through
/// lane and a left-turn lane.
///
/// The intersection owns its random source, so two intersections built from
/// the same config and the same seeded generator produce identical runs.
#[derive(Debug)]
pub struct Intersection<R = ChaCha8Rng> {
    calibration: Calibration,
    lanes: Vec<Lane>,
    completed: Vec<CompletedVehicle>,
    ticks: u64,
    rng: R,
}

impl Intersection<ChaCha8Rng> {
    /// Builds an intersection driven by a ChaCha8 stream seeded with `seed`.
    pub fn seeded(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Intersection<R> {
    /// Validates `config`, lays out the eight lanes with their starting light
    /// phases and wires each lane to its conflict lanes.
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        let calibration = Calibration::new(config)?;
        let timings = calibration.config.signal_timings();

        let mut lanes = Vec::with_capacity(Orientation::ALL.len() * LANE_TYPES.len());
        for orientation in Orientation::ALL {
            for lane_type in LANE_TYPES {
                let id = lane_slot(orientation, lane_type);
                debug_assert_eq!(id.0, lanes.len());
                let conflicts = ConflictLanes {
                    oncoming_through: lane_slot(orientation.oncoming(), LaneType::Through),
                    oncoming_left_turn: lane_slot(orientation.oncoming(), LaneType::LeftTurn),
                    crossing_through: lane_slot(orientation.crossing_from_left(), LaneType::Through),
                };
                lanes.push(Lane::new(
                    id,
                    orientation,
                    lane_type,
                    initial_light(orientation, lane_type, &timings),
                    conflicts,
                    &calibration,
                ));
            }
        }

        log::info!(
            "Intersection ready: {} lanes, {:.1} vehicles/min per approach, green {:.0}s, arrow {:.0}s, lag {:.0}s",
            lanes.len(),
            calibration.config.arrival_rate,
            timings.green,
            timings.green_arrow,
            timings.change_lag
        );

        Ok(Self {
            calibration,
            lanes,
            completed: Vec::new(),
            ticks: 0,
            rng,
        })
    }

    /// Advances every lane by one tick, then the clock.
    ///
    /// Conflict gaps are read from a copy taken before any lane moves, so
    /// every lane sees the previous tick's gaps regardless of lane order.
    pub fn tick(&mut self) {
        let clock = self.clock();
        let gaps: Vec<f64> = self.lanes.iter().map(|lane| lane.gap).collect();

        for lane in self.lanes.iter_mut() {
            let conflicts = lane.conflicts.gaps(&gaps);
            let departed = lane.step(conflicts, clock, &self.calibration, &mut self.rng);
            self.completed.extend(
                departed
                    .into_iter()
                    .map(|vehicle| CompletedVehicle::new(lane, vehicle)),
            );
        }
        self.ticks += 1;

        debug_assert_eq!(
            self.generated(),
            (self.queued() + self.completed.len()) as u64,
            "vehicles went missing"
        );
    }

    /// Runs exactly `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
        log::debug!(
            "Ran {} ticks to t={:.1}s: {} completed, {} queued",
            ticks,
            self.clock(),
            self.completed.len(),
            self.queued()
        );
    }

    /// Simulated seconds since construction.
    pub fn clock(&self) -> f64 {
        self.ticks as f64 * self.calibration.tick_secs()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.calibration.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, orientation: Orientation, lane_type: LaneType) -> &Lane {
        &self.lanes[lane_slot(orientation, lane_type).0]
    }

    pub fn lane_mut(&mut self, orientation: Orientation, lane_type: LaneType) -> &mut Lane {
        &mut self.lanes[lane_slot(orientation, lane_type).0]
    }

    /// Vehicles that have cleared the intersection, in departure order.
    pub fn completed(&self) -> &[CompletedVehicle] {
        &self.completed
    }

    /// Vehicles ever generated across all lanes.
    pub fn generated(&self) -> u64 {
        self.lanes.iter().map(Lane::generated).sum()
    }

    /// Vehicles currently waiting or moving in a lane.
    pub fn queued(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    pub fn snapshot(&self) -> IntersectionSnapshot {
        IntersectionSnapshot {
            clock: self.clock(),
            ticks: self.ticks,
            generated: self.generated(),
            completed: self.completed.len(),
            lanes: self.lanes.iter().map(Lane::snapshot).collect(),
        }
    }
}
