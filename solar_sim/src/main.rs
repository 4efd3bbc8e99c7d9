//! Solar Sim - headless solar system run
//!
//! Loads a YAML scenario (or the built-in solar system), runs the live
//! integrator for a number of rendered frames and logs where every body
//! ended up. With `--predict` it also forward-simulates the final state.
//!
//! Logging follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::Parser;
use solar_sim::{ScenarioConfig, TrajectoryPredictor, TrajectoryRequest};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Run a gravitational solar system simulation without a renderer")]
struct Args {
    /// YAML scenario; the built-in solar system when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of rendered frames to simulate
    #[arg(short, long, default_value_t = 3_000)]
    frames: u32,

    /// Wall-clock seconds per rendered frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Speed factor applied before the run
    #[arg(long)]
    speed: Option<f64>,

    /// Predict trajectories from the final state
    #[arg(short, long)]
    predict: bool,

    /// Points per predicted path, when the scenario does not set it
    #[arg(long, default_value_t = 1_000)]
    steps: usize,

    /// Body whose co-moving frame the prediction uses
    #[arg(short, long)]
    reference: Option<String>,
}

fn main() -> Result<()> {
    common::init_logging();
    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => ScenarioConfig::solar_system(),
    };

    let mut simulation = scenario.build().context("failed to start simulation")?;
    if let Some(speed) = args.speed {
        simulation.set_speed_factor(speed)?;
    }

    let energy_start = simulation.total_energy();
    let mut ticks = 0u64;
    for _ in 0..args.frames {
        ticks += u64::from(simulation.advance(args.frame_dt)?);
    }
    let energy_end = simulation.total_energy();

    log::info!(
        "{} frames, {} ticks, elapsed {}, rate {}",
        args.frames,
        ticks,
        simulation.time().format_elapsed(),
        simulation.time().format_rate()
    );
    log::info!(
        "relative energy drift {:.3e}",
        ((energy_end - energy_start) / energy_start).abs()
    );

    for body in simulation.bodies() {
        let period = body
            .orbit_period
            .map(|p| solar_sim::format_duration(p).to_string())
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "{:<8} r = {:.4e} m  v = {:.4e} m/s  period {}",
            body.name,
            body.position.length(),
            body.velocity.length(),
            period
        );
    }

    if args.predict {
        let snapshot = simulation.snapshot();
        let mut request = scenario
            .prediction_request()?
            .unwrap_or_else(|| TrajectoryRequest::new(args.steps, simulation.time().dt()));
        if let Some(name) = &args.reference {
            let index = snapshot
                .index_of(name)
                .with_context(|| format!("unknown reference body `{name}`"))?;
            request = request.relative_to(index);
        }

        let trajectories = TrajectoryPredictor::new(simulation.g()).predict(&snapshot, &request)?;
        for (name, _, path) in trajectories.iter() {
            if let Some(last) = path.last() {
                log::info!("{:<8} predicted end {:?}", name, last.to_array());
            }
        }
    }

    Ok(())
}
