//! Solar system N-body engine
//!
//! Bootstraps a stable orbit for every body from its orbital elements,
//! advances the live system with a fixed-step Velocity Verlet integrator and
//! predicts future paths on a detached copy of the bodies.
//!
//! All quantities are SI.

pub mod body;
pub mod config;
pub mod error;
pub mod gravity;
pub mod initial_state;
pub mod orbit_period;
pub mod registry;
pub mod simulation;
pub mod time_controller;
pub mod trajectory;
pub mod verlet;

pub use body::{BodyState, CelestialBody};
pub use config::{BodyConfig, PredictionConfig, ScenarioConfig, SimulationConfig};
pub use error::{Result, SimError};
pub use registry::BodyRegistry;
pub use simulation::{Phase, Simulation};
pub use time_controller::{format_duration, ControlLimits, FormattedDuration, TimeController, TimeUnit};
pub use trajectory::{predict, Snapshot, Trajectories, TrajectoryPredictor, TrajectoryRequest};
