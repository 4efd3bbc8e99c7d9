use common::constants::G;
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solar_sim::gravity;
use solar_sim::{
    BodyRegistry, CelestialBody, ControlLimits, Phase, ScenarioConfig, SimError, Simulation,
    TimeController, TrajectoryPredictor, TrajectoryRequest,
};
use std::f64::consts::PI;

const SUN_MASS: f64 = 1.989e30;
const R0: f64 = 1.5e11;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;

/// Time controller with `dt` outside the interactive limits
fn time_with_dt(dt: f64) -> TimeController {
    TimeController::with_settings(0.02, dt, 1.0, ControlLimits::default()).unwrap()
}

/// Sun plus one light body on a circular, uninclined orbit at `R0`
fn two_body_simulation(dt: f64) -> Simulation {
    two_body_simulation_with(time_with_dt(dt))
}

fn two_body_simulation_with(time: TimeController) -> Simulation {
    let bodies = vec![
        CelestialBody::new("Sun", SUN_MASS, 6.9634e8),
        CelestialBody::new("Probe", 1.0e3, 10.0)
            .orbiting("Sun", 0.0, 0.0)
            .at(DVec3::new(R0, 0.0, 0.0)),
    ];
    let registry = BodyRegistry::new(bodies, "Sun").unwrap();
    let mut simulation = Simulation::new(registry, time, G);
    simulation.start().unwrap();
    simulation
}

/// Sun, Earth, Moon and Jupiter
fn inner_system(dt: f64) -> Simulation {
    let bodies = vec![
        CelestialBody::new("Sun", SUN_MASS, 6.9634e8),
        CelestialBody::new("Earth", 5.972e24, 6.371e6)
            .orbiting("Sun", 0.0167, 0.0)
            .at(DVec3::new(1.471e11, 0.0, 0.0)),
        CelestialBody::new("Moon", 7.342e22, 1.7374e6)
            .orbiting("Earth", 0.0549, 5.145)
            .at(DVec3::new(1.471e11 + 3.633e8, 0.0, 0.0)),
        CelestialBody::new("Jupiter", 1.898e27, 6.9911e7)
            .orbiting("Sun", 0.0489, 1.303)
            .at(DVec3::new(-7.4052e11, 0.0, 0.0)),
    ];
    let registry = BodyRegistry::new(bodies, "Sun").unwrap();
    let mut simulation = Simulation::new(registry, time_with_dt(dt), G);
    simulation.start().unwrap();
    simulation
}

fn kinematics(simulation: &Simulation) -> Vec<(DVec3, DVec3, DVec3)> {
    simulation
        .bodies()
        .iter()
        .map(|b| (b.position, b.velocity, b.acceleration))
        .collect()
}

// ==================================================================================
// Initial state
// ==================================================================================

#[test]
fn two_body_initial_state_matches_closed_form() {
    let simulation = two_body_simulation(HOUR);
    let probe = simulation.body("Probe").unwrap();

    let expected_speed = (G * SUN_MASS / R0).sqrt();
    assert!((probe.velocity.length() - expected_speed).abs() / expected_speed < 1e-12);
    assert!(probe.velocity.dot(probe.position).abs() < 1e-6 * expected_speed * R0);

    let expected_period = 2.0 * PI * (R0.powi(3) / (G * SUN_MASS)).sqrt();
    let period = probe.orbit_period.unwrap();
    assert!((period - expected_period).abs() / expected_period < 1e-12);

    let expected_acc = G * SUN_MASS / (R0 * R0);
    assert!((probe.acceleration.length() - expected_acc).abs() / expected_acc < 1e-12);
}

// ==================================================================================
// Live integrator
// ==================================================================================

#[test]
fn circular_orbit_keeps_radius_over_a_period() {
    let mut simulation = two_body_simulation(HOUR);
    let period = simulation.body("Probe").unwrap().orbit_period.unwrap();
    let ticks = (period / HOUR).ceil() as usize;

    let mut worst: f64 = 0.0;
    for _ in 0..ticks {
        assert!(simulation.tick().unwrap());
        let sun = simulation.body("Sun").unwrap().position;
        let probe = simulation.body("Probe").unwrap().position;
        worst = worst.max(((probe - sun).length() - R0).abs() / R0);
    }

    assert!(worst < 1e-4, "radius drift {worst:.2e}");
    assert_eq!(simulation.ticks(), ticks as u64);
    assert_eq!(simulation.phase(), Phase::Stepping);
}

#[test]
fn observed_period_matches_kepler() {
    let mut simulation = two_body_simulation(HOUR);
    let start = simulation.body("Probe").unwrap().position;
    let period = simulation.body("Probe").unwrap().orbit_period.unwrap();

    // Times of closest approach to the starting point over three orbits
    let total = (3.2 * period / HOUR) as usize;
    let mut distances = Vec::with_capacity(total);
    for _ in 0..total {
        simulation.tick().unwrap();
        distances.push(simulation.body("Probe").unwrap().position.distance(start));
    }

    let returns: Vec<f64> = (1..distances.len() - 1)
        .filter(|&i| distances[i] < distances[i - 1] && distances[i] <= distances[i + 1])
        .filter(|&i| distances[i] < 0.05 * R0)
        .map(|i| (i + 1) as f64 * HOUR)
        .collect();

    assert_eq!(returns.len(), 3, "returns at {returns:?}");
    for (k, t) in returns.iter().enumerate() {
        let expected = (k + 1) as f64 * period;
        assert!((t - expected).abs() / expected < 0.02, "return {k} at {t}, expected {expected}");
    }
}

#[test]
fn n_body_energy_and_momentum_are_conserved() {
    let mut simulation = inner_system(HOUR);
    let g = simulation.g();
    let initial = simulation.registry().states();
    let e0 = gravity::total_energy(&initial, g);
    let l0 = gravity::angular_momentum(&initial);

    for _ in 0..5_000 {
        simulation.tick().unwrap();
    }

    let last = simulation.registry().states();
    let e_drift = ((gravity::total_energy(&last, g) - e0) / e0).abs();
    let l_drift = (gravity::angular_momentum(&last) - l0).length() / l0.length();

    assert!(e_drift < 1e-5, "energy drift {e_drift:.2e}");
    assert!(l_drift < 1e-9, "angular momentum drift {l_drift:.2e}");
}

#[test]
fn random_clusters_conserve_energy() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..3 {
        let mut bodies = vec![CelestialBody::new("Sun", SUN_MASS, 6.9634e8)];
        for k in 0..6 {
            // Well separated orbits so no two planets meet
            let distance = 0.5 * 1.6f64.powi(k) * rng.gen_range(0.95..1.05) * R0;
            let angle: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
            bodies.push(
                CelestialBody::new(&format!("P{k}"), rng.gen_range(1.0e22..1.0e25), 1.0e6)
                    .orbiting("Sun", rng.gen_range(0.0..0.05), rng.gen_range(0.0..10.0))
                    .at(DVec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)),
            );
        }
        let registry = BodyRegistry::new(bodies, "Sun").unwrap();
        let mut simulation = Simulation::new(registry, time_with_dt(HOUR), G);
        simulation.start().unwrap();

        let e0 = simulation.total_energy();
        for _ in 0..2_000 {
            simulation.tick().unwrap();
        }
        let drift = ((simulation.total_energy() - e0) / e0).abs();
        assert!(drift < 1e-5, "energy drift {drift:.2e}");
    }
}

// ==================================================================================
// Lifecycle and controls
// ==================================================================================

#[test]
fn ticking_before_start_is_refused() {
    let bodies = vec![CelestialBody::new("Sun", SUN_MASS, 6.9634e8)];
    let registry = BodyRegistry::new(bodies, "Sun").unwrap();
    let mut simulation = Simulation::new(registry, TimeController::new(), G);

    assert_eq!(simulation.phase(), Phase::Uninitialized);
    assert!(matches!(simulation.tick(), Err(SimError::NotStarted)));
    assert!(matches!(simulation.advance(1.0), Err(SimError::NotStarted)));

    simulation.start().unwrap();
    assert_eq!(simulation.phase(), Phase::Ready);
    assert!(matches!(simulation.start(), Err(SimError::AlreadyStarted)));
}

#[test]
fn pause_freezes_everything() {
    let mut simulation = two_body_simulation(HOUR);
    simulation.advance(0.1).unwrap();
    let frozen = kinematics(&simulation);
    let elapsed = simulation.elapsed();
    let ticks = simulation.ticks();

    simulation.set_paused(true);
    assert_eq!(simulation.phase(), Phase::Paused);
    for _ in 0..10 {
        assert_eq!(simulation.advance(0.5).unwrap(), 0);
        assert!(!simulation.tick().unwrap());
    }
    simulation.set_paused(false);
    assert_eq!(simulation.phase(), Phase::Stepping);
    simulation.advance(0.0).unwrap();

    assert_eq!(kinematics(&simulation), frozen);
    assert_eq!(simulation.elapsed(), elapsed);
    assert_eq!(simulation.ticks(), ticks);
}

#[test]
fn resuming_before_any_tick_returns_to_ready() {
    let mut simulation = two_body_simulation(HOUR);
    simulation.toggle_pause();
    assert!(simulation.is_paused());
    simulation.toggle_pause();
    assert_eq!(simulation.phase(), Phase::Ready);
}

#[test]
fn frames_drive_fixed_ticks() {
    // Binary-exact intervals keep the tick count free of rounding
    let time = TimeController::with_settings(0.25, HOUR, 1.0, ControlLimits::default()).unwrap();
    let mut simulation = two_body_simulation_with(time);

    let mut ticks = 0;
    for _ in 0..4 {
        ticks += simulation.advance(0.3125).unwrap();
    }
    assert_eq!(ticks, 5);
    assert!((simulation.elapsed() - 5.0 * HOUR).abs() < 1e-6);

    // Doubling the speed doubles the ticks for the same wall time
    simulation.set_speed_factor(2.0).unwrap();
    let mut fast = 0;
    for _ in 0..4 {
        fast += simulation.advance(0.3125).unwrap();
    }
    assert_eq!(fast, 10);
}

#[test]
fn invalid_controls_are_rejected() {
    let mut simulation = two_body_simulation(HOUR);

    assert!(simulation.set_dt(-1.0).is_err());
    assert!(simulation.set_speed_factor(0.0).is_err());
    assert_eq!(simulation.time().dt(), HOUR);
    assert_eq!(simulation.time().speed_factor(), 1.0);

    simulation.set_dt(600.0).unwrap();
    simulation.tick().unwrap();
    assert_eq!(simulation.time().dt(), 600.0);
}

#[test]
fn speed_buttons_scale_tick_rate() {
    let mut simulation = two_body_simulation(HOUR);

    simulation.speed_up(2.0).unwrap();
    simulation.speed_up(2.0).unwrap();
    assert_eq!(simulation.time().speed_factor(), 4.0);
    assert!((simulation.tick_interval() - 0.005).abs() < 1e-15);

    simulation.slow_down(8.0).unwrap();
    assert_eq!(simulation.time().speed_factor(), 0.5);

    // Past the speed limit nothing changes
    assert!(simulation.speed_up(1_000.0).is_err());
    assert!(simulation.slow_down(100.0).is_err());
    assert!(simulation.speed_up(-1.0).is_err());
    assert_eq!(simulation.time().speed_factor(), 0.5);
    assert_eq!(simulation.time().dt(), HOUR);
}

#[test]
fn orbit_wall_time_tracks_rate() {
    let simulation = two_body_simulation(HOUR);
    let period = simulation.body("Probe").unwrap().orbit_period.unwrap();

    let wall = simulation.orbit_wall_time("Probe").unwrap();
    assert!((wall - period * 0.02 / HOUR).abs() < 1e-9);
    assert!(simulation.orbit_wall_time("Sun").is_none());
}

// ==================================================================================
// Prediction against the live simulation
// ==================================================================================

#[test]
fn prediction_leaves_live_state_alone() {
    let mut simulation = inner_system(HOUR);
    for _ in 0..10 {
        simulation.tick().unwrap();
    }
    let before = kinematics(&simulation);

    let snapshot = simulation.snapshot();
    let predictor = TrajectoryPredictor::new(simulation.g());
    let trajectories = predictor
        .predict(&snapshot, &TrajectoryRequest::new(2_000, DAY).relative_to(1))
        .unwrap();

    assert_eq!(trajectories.len(), 4);
    assert_eq!(kinematics(&simulation), before);
    assert_eq!(simulation.snapshot(), snapshot);
}

#[test]
fn prediction_matches_live_run() {
    let mut simulation = two_body_simulation(HOUR);
    let snapshot = simulation.snapshot();
    let trajectories = solar_sim::predict(&snapshot, &TrajectoryRequest::new(25, HOUR), G).unwrap();

    for _ in 0..24 {
        simulation.tick().unwrap();
    }

    let live = simulation.body("Probe").unwrap().position;
    assert_eq!(trajectories.path_by_name("Probe").unwrap()[24], live);
}

#[test]
fn prediction_runs_alongside_live_ticks() {
    let mut simulation = inner_system(HOUR);
    let snapshot = simulation.snapshot();
    let request = TrajectoryRequest::new(1_000, DAY);
    let expected = solar_sim::predict(&snapshot, &request, G).unwrap();

    let worker = std::thread::spawn(move || solar_sim::predict(&snapshot, &request, G));
    for _ in 0..1_000 {
        simulation.tick().unwrap();
    }
    let concurrent = worker.join().unwrap().unwrap();

    assert_eq!(concurrent, expected);
    assert_eq!(simulation.ticks(), 1_000);
}

#[test]
fn preset_runs_headless() {
    let mut simulation = ScenarioConfig::solar_system().build().unwrap();
    let e0 = simulation.total_energy();

    for _ in 0..600 {
        simulation.advance(1.0 / 60.0).unwrap();
    }

    assert!((498..=500).contains(&simulation.ticks()));
    let drift = ((simulation.total_energy() - e0) / e0).abs();
    assert!(drift < 1e-6, "energy drift {drift:.2e}");
    assert!(simulation.bodies().iter().all(|b| b.position.is_finite()));
}

#[test]
fn bundled_scenario_loads_and_predicts() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/inner_planets.yaml");
    let scenario = ScenarioConfig::load(path).unwrap();
    let mut simulation = scenario.build().unwrap();
    assert_eq!(simulation.bodies().len(), 6);
    assert_eq!(simulation.phase(), Phase::Ready);

    for _ in 0..60 {
        simulation.advance(1.0 / 60.0).unwrap();
    }

    let request = scenario.prediction_request().unwrap().unwrap();
    let trajectories = TrajectoryPredictor::new(simulation.g())
        .predict(&simulation.snapshot(), &request)
        .unwrap();

    let earth = trajectories.path_by_name("Earth").unwrap();
    assert_eq!(earth.len(), 400);
    assert!(earth.iter().all(|p| *p == earth[0]));
}
