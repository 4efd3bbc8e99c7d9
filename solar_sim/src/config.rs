//! Scenario configuration loaded from YAML
//!
//! A scenario has three sections:
//!
//! - [`SimulationConfig`] – gravitational constant, tick timing, root name
//! - [`PredictionConfig`] – optional trajectory prediction settings
//! - [`BodyConfig`]       – one entry per body, in registry order
//!
//! ```yaml
//! simulation:
//!   g: 6.67384e-11
//!   dt: 360.0               # simulated seconds per tick
//!   tick_interval: 0.02     # wall-clock seconds per tick at speed 1
//!   speed_factor: 1.0
//!   root: Sun
//!
//! prediction:
//!   steps: 1000
//!   dt: 86400.0
//!   reference: Earth        # optional co-moving frame
//!
//! bodies:
//!   - name: Sun
//!     mass: 1.989e30
//!     radius: 6.9634e8
//!     position: [0.0, 0.0, 0.0]
//!   - name: Earth
//!     mass: 5.972e24
//!     radius: 6.371e6
//!     eccentricity: 0.0167
//!     orbits: Sun
//!     axial_tilt: 23.44
//!     rotation_period: 86164.0
//!     position: [1.471e11, 0.0, 0.0]
//!     color: [0.2, 0.4, 0.8, 1.0]
//! ```

use crate::body::CelestialBody;
use crate::error::{Result, SimError};
use crate::registry::BodyRegistry;
use crate::simulation::Simulation;
use crate::time_controller::{ControlLimits, TimeController};
use crate::trajectory::TrajectoryRequest;
use common::constants::{DEFAULT_DT, DEFAULT_ROOT_NAME, DEFAULT_TICK_INTERVAL, G};
use glam::DVec3;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Global physical and timing parameters
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub g: f64,
    pub dt: f64,
    pub tick_interval: f64,
    pub speed_factor: f64,
    pub paused: bool,
    pub root: String, // name of the body every orbit chain ends at
    pub limits: ControlLimits,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            g: G,
            dt: DEFAULT_DT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            speed_factor: 1.0,
            paused: false,
            root: DEFAULT_ROOT_NAME.to_string(),
            limits: ControlLimits::default(),
        }
    }
}

/// Trajectory prediction settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    pub steps: usize,
    pub dt: f64,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Static description of a single body
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub mass: f64,   // kg
    pub radius: f64, // m
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination: f64, // degrees
    #[serde(default)]
    pub orbits: Option<String>,
    #[serde(default)]
    pub axial_tilt: f64, // degrees
    #[serde(default)]
    pub rotation_period: f64, // s
    pub position: [f64; 3], // m, at an apsis
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub ui_priority: i32,
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl BodyConfig {
    pub fn to_body(&self) -> CelestialBody {
        let mut body = CelestialBody::new(&self.name, self.mass, self.radius)
            .at(DVec3::from_array(self.position))
            .with_rotation(self.axial_tilt, self.rotation_period)
            .with_color(self.color)
            .with_ui_priority(self.ui_priority);
        if let Some(parent) = &self.orbits {
            body = body.orbiting(parent, self.eccentricity, self.inclination);
        } else {
            body.eccentricity = self.eccentricity;
            body.inclination = self.inclination;
        }
        body
    }
}

/// Top-level scenario
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub prediction: Option<PredictionConfig>,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let scenario: ScenarioConfig = serde_yaml::from_reader(reader)?;
        log::info!(
            "loaded {} bodies from {}",
            scenario.bodies.len(),
            path.as_ref().display()
        );
        Ok(scenario)
    }

    pub fn registry(&self) -> Result<BodyRegistry> {
        let bodies = self.bodies.iter().map(BodyConfig::to_body).collect();
        BodyRegistry::new(bodies, &self.simulation.root)
    }

    pub fn time_controller(&self) -> Result<TimeController> {
        let sim = &self.simulation;
        let mut time = TimeController::with_settings(
            sim.tick_interval,
            sim.dt,
            sim.speed_factor,
            sim.limits,
        )?;
        if sim.paused {
            time.pause();
        }
        Ok(time)
    }

    /// Validate the scenario and start a simulation from it
    pub fn build(&self) -> Result<Simulation> {
        let mut simulation = Simulation::new(
            self.registry()?,
            self.time_controller()?,
            self.simulation.g,
        );
        simulation.start()?;
        Ok(simulation)
    }

    /// The configured prediction, with the reference body resolved to an index
    pub fn prediction_request(&self) -> Result<Option<TrajectoryRequest>> {
        let Some(prediction) = &self.prediction else {
            return Ok(None);
        };
        let mut request = TrajectoryRequest::new(prediction.steps, prediction.dt);
        if let Some(name) = &prediction.reference {
            let index = self
                .bodies
                .iter()
                .position(|b| &b.name == name)
                .ok_or_else(|| SimError::NoSuchBody(name.clone()))?;
            request = request.relative_to(index);
        }
        Ok(Some(request))
    }

    /// The Sun, the eight planets at perihelion and the Moon at perigee
    pub fn solar_system() -> Self {
        const EARTH_PERIHELION: f64 = 1.471e11;

        let planet = |name: &str,
                      mass: f64,
                      radius: f64,
                      eccentricity: f64,
                      inclination: f64,
                      perihelion: f64,
                      axial_tilt: f64,
                      rotation_period: f64,
                      color: [f32; 4],
                      ui_priority: i32| BodyConfig {
            name: name.to_string(),
            mass,
            radius,
            eccentricity,
            inclination,
            orbits: Some("Sun".to_string()),
            axial_tilt,
            rotation_period,
            position: [perihelion, 0.0, 0.0],
            color,
            ui_priority,
        };

        let bodies = vec![
            BodyConfig {
                name: "Sun".to_string(),
                mass: 1.989e30,
                radius: 6.9634e8,
                eccentricity: 0.0,
                inclination: 0.0,
                orbits: None,
                axial_tilt: 7.25,
                rotation_period: 2.1686e6,
                position: [0.0, 0.0, 0.0],
                color: [1.0, 0.95, 0.8, 1.0],
                ui_priority: 0,
            },
            planet("Mercury", 3.301e23, 2.4397e6, 0.2056, 7.0, 4.6e10, 0.034, 5.0674e6, [0.7, 0.7, 0.7, 1.0], 2),
            planet("Venus", 4.867e24, 6.0518e6, 0.0068, 3.39, 1.0748e11, 177.4, -2.0997e7, [0.9, 0.7, 0.5, 1.0], 2),
            planet("Earth", 5.972e24, 6.371e6, 0.0167, 0.0, EARTH_PERIHELION, 23.44, 86_164.0, [0.2, 0.4, 0.8, 1.0], 1),
            BodyConfig {
                name: "Moon".to_string(),
                mass: 7.342e22,
                radius: 1.7374e6,
                eccentricity: 0.0549,
                inclination: 5.145,
                orbits: Some("Earth".to_string()),
                axial_tilt: 6.68,
                rotation_period: 2.3606e6,
                position: [EARTH_PERIHELION + 3.633e8, 0.0, 0.0],
                color: [0.8, 0.8, 0.8, 1.0],
                ui_priority: 4,
            },
            planet("Mars", 6.417e23, 3.3895e6, 0.0934, 1.85, 2.0665e11, 25.19, 88_643.0, [0.8, 0.4, 0.2, 1.0], 2),
            planet("Jupiter", 1.898e27, 6.9911e7, 0.0489, 1.303, 7.4052e11, 3.13, 35_730.0, [0.9, 0.8, 0.6, 1.0], 1),
            planet("Saturn", 5.683e26, 5.8232e7, 0.0565, 2.485, 1.35255e12, 26.73, 38_362.0, [0.9, 0.85, 0.6, 1.0], 1),
            planet("Uranus", 8.681e25, 2.5362e7, 0.0457, 0.773, 2.7413e12, 97.77, -62_064.0, [0.6, 0.8, 0.9, 1.0], 2),
            planet("Neptune", 1.024e26, 2.4622e7, 0.0113, 1.77, 4.44445e12, 28.32, 57_996.0, [0.3, 0.4, 0.8, 1.0], 2),
        ];

        Self {
            simulation: SimulationConfig::default(),
            prediction: None,
            bodies,
        }
    }
}
