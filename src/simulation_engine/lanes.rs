use crate::control_system::traffic_light_controller::{LightState, TrafficLight};
use crate::shared_data::LaneSnapshot;
use crate::simulation_engine::calibration::Calibration;
use crate::simulation_engine::config::TurnProportions;
use crate::simulation_engine::vehicles::{ConflictGaps, Intention, Leader, Signal, Vehicle};
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

/// Movement a lane serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneType {
    /// Straight-on and right-turning traffic.
    Through,
    /// Dedicated left-turn pocket.
    LeftTurn,
}

/// The approach a lane's traffic comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    South,
    East,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::West,
        Orientation::South,
        Orientation::East,
    ];

    /// The approach facing this one.
    pub fn oncoming(self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::South => Orientation::North,
            Orientation::East => Orientation::West,
            Orientation::West => Orientation::East,
        }
    }

    /// The approach on the driver's left. Its through traffic crosses in front
    /// of a right turn on red and ends up in the same exit lane.
    pub fn crossing_from_left(self) -> Orientation {
        match self {
            Orientation::North => Orientation::East,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
            Orientation::East => Orientation::South,
        }
    }

    /// North and South share a signal phase, as do East and West.
    pub fn is_north_south(self) -> bool {
        matches!(self, Orientation::North | Orientation::South)
    }
}

/// Index of a lane in its intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneId(pub usize);

/// The lanes whose gap decides whether a turn may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictLanes {
    pub oncoming_through: LaneId,
    pub oncoming_left_turn: LaneId,
    pub crossing_through: LaneId,
}

impl ConflictLanes {
    /// Reads the conflict lanes' gaps out of a per-lane gap table.
    pub fn gaps(&self, gaps: &[f64]) -> ConflictGaps {
        ConflictGaps {
            oncoming_through: gaps[self.oncoming_through.0],
            oncoming_left_turn: gaps[self.oncoming_left_turn.0],
            crossing_through: gaps[self.crossing_through.0],
        }
    }
}

/// Fraction of an approach's arrivals that use a lane of this type.
pub fn arrival_share(lane_type: LaneType, turns: &TurnProportions) -> f64 {
    match lane_type {
        LaneType::LeftTurn => turns.left,
        LaneType::Through => 1.0 - turns.left,
    }
}

/// A single queue of vehicles waiting at one approach.
///
/// `vehicles[0]` is the head, nearest the stop line; new arrivals join at the back.
#[derive(Debug, Clone)]
pub struct Lane {
    pub id: LaneId,
    pub orientation: Orientation,
    pub lane_type: LaneType,
    pub light: TrafficLight,
    pub conflicts: ConflictLanes,
    /// Head vehicle's seconds to the stop line; infinite when nothing is coming.
    pub gap: f64,
    vehicles: Vec<Vehicle>,
    generated: u64,
    arrivals: Option<Poisson<f64>>,
    straight_share: f64,
}

impl Lane {
    pub fn new(
        id: LaneId,
        orientation: Orientation,
        lane_type: LaneType,
        light: TrafficLight,
        conflicts: ConflictLanes,
        calibration: &Calibration,
    ) -> Self {
        let config = &calibration.config;
        let per_minute = config.arrival_rate * arrival_share(lane_type, &config.turn_proportions);
        let per_tick = config.tick_secs * per_minute / 60.0;
        // Poisson needs a positive mean; an idle lane simply never draws.
        let arrivals = if per_tick > 0.0 {
            Poisson::new(per_tick).ok()
        } else {
            None
        };

        Self {
            id,
            orientation,
            lane_type,
            light,
            conflicts,
            gap: f64::INFINITY,
            vehicles: Vec::new(),
            generated: 0,
            arrivals,
            straight_share: config.turn_proportions.straight_share_of_through(),
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn head(&self) -> Option<&Vehicle> {
        self.vehicles.first()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicles ever created in this lane.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Draws this tick's Poisson arrivals and queues them. Returns how many arrived.
    pub fn generate_arrivals<R: Rng + ?Sized>(
        &mut self,
        clock: f64,
        calibration: &Calibration,
        rng: &mut R,
    ) -> usize {
        let count = match &self.arrivals {
            Some(poisson) => poisson.sample(rng) as usize,
            None => 0,
        };
        for _ in 0..count {
            let intention = self.draw_intention(rng);
            self.spawn_vehicle(intention, clock, calibration, rng);
        }
        count
    }

    fn draw_intention<R: Rng + ?Sized>(&self, rng: &mut R) -> Intention {
        match self.lane_type {
            LaneType::LeftTurn => Intention::LeftTurn,
            LaneType::Through => {
                if rng.random::<f64>() < self.straight_share {
                    Intention::Straight
                } else {
                    Intention::RightTurn
                }
            }
        }
    }

    /// Appends one vehicle behind the current tail.
    pub fn spawn_vehicle<R: Rng + ?Sized>(
        &mut self,
        intention: Intention,
        clock: f64,
        calibration: &Calibration,
        rng: &mut R,
    ) -> &Vehicle {
        let leader = self
            .vehicles
            .last()
            .map(Leader::of)
            .unwrap_or(Leader::OPEN_ROAD);
        let vehicle = Vehicle::new(self.generated, leader, intention, clock, calibration, rng);
        self.generated += 1;
        self.vehicles.push(vehicle);
        &self.vehicles[self.vehicles.len() - 1]
    }

    /// Moves every vehicle front to back. Each follower reacts to where its
    /// leader ended up this tick.
    pub fn advance_vehicles<R: Rng + ?Sized>(
        &mut self,
        conflicts: ConflictGaps,
        calibration: &Calibration,
        rng: &mut R,
    ) {
        let signal = Signal {
            light: self.light.state,
            time_to_change: self.light.time_to_change,
            conflicts,
        };
        let mut leader = Leader::OPEN_ROAD;
        for vehicle in self.vehicles.iter_mut() {
            vehicle.advance(leader, &signal, calibration, rng);
            leader = Leader::of(vehicle);
        }
        debug_assert!(self.is_ordered(), "lane {:?} queue out of order", self.id);
    }

    fn is_ordered(&self) -> bool {
        self.vehicles
            .windows(2)
            .all(|pair| pair[0].location <= pair[1].location)
    }

    /// Takes every vehicle past the stop line out of the queue, stamped with
    /// the departure time, in queue order.
    pub fn remove_arrived(&mut self, clock: f64) -> Vec<Vehicle> {
        let (mut departed, remaining): (Vec<Vehicle>, Vec<Vehicle>) = std::mem::take(&mut self.vehicles)
            .into_iter()
            .partition(Vehicle::has_cleared);
        self.vehicles = remaining;
        for vehicle in departed.iter_mut() {
            vehicle.depart(clock);
        }
        departed
    }

    pub fn update_gap(&mut self) {
        self.gap = self
            .head()
            .map(Vehicle::time_to_stop_line)
            .unwrap_or(f64::INFINITY);
    }

    /// Runs the light countdown. On a switch to green or green arrow, a car
    /// already stopped at the front gets the longer first-car reaction time.
    pub fn advance_light<R: Rng + ?Sized>(
        &mut self,
        calibration: &Calibration,
        rng: &mut R,
    ) -> Option<LightState> {
        let timings = calibration.config.signal_timings();
        let transition = self.light.update(calibration.tick_secs(), &timings);
        if let Some(state) = transition {
            log::debug!(
                "{:?} {:?} lane switched to {:?} for {:.1}s",
                self.orientation,
                self.lane_type,
                state,
                self.light.time_to_change
            );
            if state.is_go() {
                if let Some(head) = self.vehicles.first_mut() {
                    if head.is_stationary() {
                        head.reaction_remaining = calibration.sample_first_car_reaction(rng);
                    }
                }
            }
        }
        transition
    }

    /// Overrides the light, e.g. to hold a lane on green in a scenario.
    pub fn set_light(&mut self, state: LightState, time_to_change: f64) {
        self.light.force(state, time_to_change);
    }

    /// One full tick for this lane: arrivals, movement, departures, gap, light.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        conflicts: ConflictGaps,
        clock: f64,
        calibration: &Calibration,
        rng: &mut R,
    ) -> Vec<Vehicle> {
        self.generate_arrivals(clock, calibration, rng);
        self.advance_vehicles(conflicts, calibration, rng);
        let departed = self.remove_arrived(clock);
        self.update_gap();
        self.advance_light(calibration, rng);
        departed
    }

    pub fn snapshot(&self) -> LaneSnapshot {
        LaneSnapshot {
            lane: self.id,
            orientation: self.orientation,
            lane_type: self.lane_type,
            light: self.light.state,
            time_to_change: self.light.time_to_change,
            vehicle_count: self.vehicles.len(),
            head_location: self.head().map(|v| v.location),
        }
    }
}
