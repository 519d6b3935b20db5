//! End-to-end scenarios for the signal cycles and the turning rules.
//!
//! Run: cargo test --test signal_scenarios

use intersection_sim::control_system::traffic_light_controller::TrafficLight;
use intersection_sim::simulation_engine::calibration::Calibration;
use intersection_sim::simulation_engine::lanes::{ConflictLanes, Lane};
use intersection_sim::simulation_engine::vehicles::ConflictGaps;
use intersection_sim::{
    Intention, Intersection, LaneId, LaneType, LightState, Orientation, SimulationConfig,
    TurnProportions,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn ticks(secs: f64, tick_secs: f64) -> u64 {
    (secs / tick_secs).round() as u64
}

/// Runs an idle intersection and returns (tick, new state) for every light change of one lane.
fn transitions(orientation: Orientation, lane_type: LaneType, total_ticks: u64) -> Vec<(u64, LightState)> {
    let config = SimulationConfig::default().with_arrival_rate(0.0);
    let mut intersection = Intersection::seeded(config, 0).unwrap();
    let mut previous = intersection.lane(orientation, lane_type).light.state;
    let mut changes = Vec::new();
    for tick in 1..=total_ticks {
        intersection.tick();
        let state = intersection.lane(orientation, lane_type).light.state;
        if state != previous {
            changes.push((tick, state));
            previous = state;
        }
    }
    changes
}

fn standalone_lane(lane_type: LaneType, light: LightState, time_to_change: f64, calibration: &Calibration) -> Lane {
    Lane::new(
        LaneId(0),
        Orientation::North,
        lane_type,
        TrafficLight::new(lane_type, light, time_to_change),
        ConflictLanes {
            oncoming_through: LaneId(0),
            oncoming_left_turn: LaneId(0),
            crossing_through: LaneId(0),
        },
        calibration,
    )
}

#[test]
fn test_idle_intersection_completes_nothing_but_lights_cycle() {
    let config = SimulationConfig::default().with_arrival_rate(0.0);
    let mut intersection = Intersection::seeded(config, 7).unwrap();
    intersection.run(100);
    assert!(intersection.completed().is_empty());
    assert_eq!(intersection.generated(), 0);
    assert!((intersection.clock() - 10.0).abs() < 1e-9);

    let north = intersection.lane(Orientation::North, LaneType::Through);
    assert_eq!(north.light.state, LightState::Green);
    assert!((north.light.time_to_change - 20.0).abs() < 1e-6);
    let east = intersection.lane(Orientation::East, LaneType::Through);
    assert_eq!(east.light.state, LightState::Red);
    assert!((east.light.time_to_change - 22.0).abs() < 1e-6);
    let west_left = intersection.lane(Orientation::West, LaneType::LeftTurn);
    assert!((west_left.light.time_to_change - 22.0).abs() < 1e-6);

    // Keep going: the lights still run on schedule with no traffic
    intersection.run(200);
    assert_eq!(
        intersection.lane(Orientation::North, LaneType::Through).light.state,
        LightState::Red
    );
    assert!(intersection.completed().is_empty());
}

#[test]
fn test_through_light_alternates_with_configured_durations() {
    let config = SimulationConfig::default();
    let dt = config.tick_secs;
    let timings = config.signal_timings();
    let green = ticks(timings.green, dt);
    let red = ticks(timings.through_red(), dt);
    let cycle = green + red;

    let changes = transitions(Orientation::North, LaneType::Through, 3 * cycle);
    let expected: Vec<(u64, LightState)> = (0..3)
        .flat_map(|k| {
            [
                (k * cycle + green, LightState::Red),
                ((k + 1) * cycle, LightState::Green),
            ]
        })
        .collect();
    assert_eq!(changes, expected);
}

#[test]
fn test_east_through_starts_after_north_green_and_lag() {
    let config = SimulationConfig::default();
    let dt = config.tick_secs;
    let timings = config.signal_timings();
    let changes = transitions(Orientation::East, LaneType::Through, ticks(timings.through_cycle(), dt));
    assert_eq!(
        changes.first(),
        Some(&(ticks(timings.green + timings.change_lag, dt), LightState::Green))
    );
}

#[test]
fn test_left_turn_light_visits_every_state_in_order() {
    let config = SimulationConfig::default();
    let dt = config.tick_secs;
    let timings = config.signal_timings();
    let changes = transitions(Orientation::South, LaneType::LeftTurn, 4_000);

    let order = [
        LightState::GreenArrow,
        LightState::RedBetweenArrowAndGreen,
        LightState::Green,
        LightState::Red,
    ];
    assert!(changes.len() >= 8);
    for (i, (_, state)) in changes.iter().enumerate() {
        assert_eq!(*state, order[i % order.len()]);
    }

    let durations: Vec<u64> = changes.windows(2).map(|w| w[1].0 - w[0].0).collect();
    let expected = [
        ticks(timings.green_arrow, dt),
        ticks(timings.change_lag, dt),
        ticks(timings.green_arrow, dt),
        ticks(timings.left_turn_red(), dt),
    ];
    for (i, duration) in durations.iter().enumerate() {
        assert_eq!(*duration, expected[i % expected.len()], "phase {i}");
    }
}

#[test]
fn test_perpendicular_through_lanes_never_green_together() {
    let config = SimulationConfig::default().with_arrival_rate(0.0);
    let mut intersection = Intersection::seeded(config, 0).unwrap();
    for _ in 0..10_000 {
        intersection.tick();
        let north_south = intersection.lane(Orientation::North, LaneType::Through).light.state
            == LightState::Green
            || intersection.lane(Orientation::South, LaneType::Through).light.state == LightState::Green;
        let east_west = intersection.lane(Orientation::East, LaneType::Through).light.state
            == LightState::Green
            || intersection.lane(Orientation::West, LaneType::Through).light.state == LightState::Green;
        assert!(!(north_south && east_west), "conflicting greens at t={}", intersection.clock());
    }
}

#[test]
fn test_first_vehicle_on_green_departs_after_travel_time() {
    let config = SimulationConfig {
        // About 20 arrivals per tick, so the first tick is never empty
        arrival_rate: 12_000.0,
        turn_proportions: TurnProportions {
            left: 0.0,
            straight: 1.0,
            right: 0.0,
        },
        ..SimulationConfig::default()
    };
    let calibration = Calibration::new(config).unwrap();
    let dt = calibration.tick_secs();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut lane = standalone_lane(LaneType::Through, LightState::Green, 1_000.0, &calibration);

    assert!(lane.generate_arrivals(0.0, &calibration, &mut rng) >= 1);
    let first = lane.head().unwrap().clone();
    assert_eq!(first.intention, Intention::Straight);
    let expected_travel = first.location / first.speed;

    let mut tick: u64 = 0;
    let departed = loop {
        let clock = tick as f64 * dt;
        lane.advance_vehicles(ConflictGaps::OPEN, &calibration, &mut rng);
        let departed = lane.remove_arrived(clock);
        lane.update_gap();
        lane.advance_light(&calibration, &mut rng);
        if let Some(v) = departed.into_iter().find(|v| v.id == first.id) {
            break v;
        }
        tick += 1;
        assert!(tick < 10_000, "first vehicle never left");
    };

    assert_eq!(lane.light.state, LightState::Green);
    let duration = departed.duration.unwrap();
    assert!(duration > 0.0 && duration.is_finite());
    let departure = departed.departure_time.unwrap();
    assert!(
        (departure - (first.arrival_time + expected_travel)).abs() <= dt + 1e-9,
        "departed at {departure}, expected about {}",
        first.arrival_time + expected_travel
    );
}

#[test]
fn test_left_turn_blocked_by_oncoming_waits_for_arrow() {
    // Quick starters, so the arrow is always long enough to clear the line
    let config = SimulationConfig {
        first_car_reaction_mean: 0.5,
        ..SimulationConfig::default()
    };
    let calibration = Calibration::new(config).unwrap();
    let dt = calibration.tick_secs();
    let mut rng = ChaCha8Rng::seed_from_u64(33);
    let mut lane = standalone_lane(LaneType::LeftTurn, LightState::Green, 20.0, &calibration);
    // Oncoming through traffic always right on top of the stop line
    let blocked = ConflictGaps {
        oncoming_through: 0.0,
        ..ConflictGaps::OPEN
    };

    lane.spawn_vehicle(Intention::LeftTurn, 0.0, &calibration, &mut rng);
    let mut speed = lane.head().unwrap().speed;
    let mut seen_arrow = false;
    let mut left_at = None;

    for tick in 0..2_000u64 {
        let clock = tick as f64 * dt;
        let light = lane.light.state;
        seen_arrow |= light == LightState::GreenArrow;

        lane.advance_vehicles(blocked, &calibration, &mut rng);
        let departed = lane.remove_arrived(clock);
        if !seen_arrow {
            assert!(departed.is_empty(), "crossed on {light:?} at t={clock}");
            let head = lane.head().unwrap();
            assert!(head.speed <= speed, "sped up on {light:?} at t={clock}");
            assert!(head.location >= 0.0);
            speed = head.speed;
        } else if !departed.is_empty() {
            left_at = Some(clock);
            break;
        }
        lane.update_gap();
        lane.advance_light(&calibration, &mut rng);
    }

    assert!(seen_arrow);
    let left_at = left_at.expect("vehicle never turned on the arrow");
    // Green 20 s, then red for green + lag, then the arrow opens
    let arrow_opens = 20.0 + calibration.config.green_secs + calibration.config.change_lag_secs;
    assert!(left_at >= arrow_opens - 1e-9);
    assert!(left_at < arrow_opens + calibration.config.green_arrow_secs);
}

#[test]
fn test_right_turn_on_red_goes_when_crossing_lane_is_clear() {
    let config = SimulationConfig::default();
    let calibration = Calibration::new(config).unwrap();
    let dt = calibration.tick_secs();
    let mut rng = ChaCha8Rng::seed_from_u64(44);
    let mut lane = standalone_lane(LaneType::Through, LightState::Red, 1_000.0, &calibration);

    lane.spawn_vehicle(Intention::RightTurn, 0.0, &calibration, &mut rng);
    lane.spawn_vehicle(Intention::Straight, 0.0, &calibration, &mut rng);

    let mut departed_ids = Vec::new();
    for tick in 0..600u64 {
        lane.advance_vehicles(ConflictGaps::OPEN, &calibration, &mut rng);
        departed_ids.extend(lane.remove_arrived(tick as f64 * dt).iter().map(|v| v.id));
    }
    // The right turner leaves on red; the straight-on car stays queued behind the line
    assert_eq!(departed_ids, vec![0]);
    assert_eq!(lane.len(), 1);
    assert!(lane.head().unwrap().location >= 1.0 - 1e-9);
}
