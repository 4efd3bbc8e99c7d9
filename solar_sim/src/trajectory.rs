//! Trajectory prediction on a private copy of the bodies
//!
//! The predictor runs the same Velocity Verlet step as the live simulation,
//! but on a snapshot it owns, so it can run on any thread while the live
//! simulation keeps ticking. Paths are recomputed from scratch on every
//! request.

use crate::body::BodyState;
use crate::error::{Result, SimError};
use crate::registry::BodyRegistry;
use crate::verlet;
use glam::DVec3;

/// Default upper bound on the number of points per path
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Point-in-time copy of every body, taken between ticks
///
/// Names, colours and states always have one entry per body.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    names: Vec<String>,
    colors: Vec<[f32; 4]>,
    states: Vec<BodyState>,
}

impl Snapshot {
    pub fn new(names: Vec<String>, colors: Vec<[f32; 4]>, states: Vec<BodyState>) -> Result<Self> {
        if names.len() != states.len() || colors.len() != states.len() {
            return Err(SimError::InvalidRequest(format!(
                "snapshot has {} names and {} colours for {} bodies",
                names.len(),
                colors.len(),
                states.len()
            )));
        }
        Ok(Self {
            names,
            colors,
            states,
        })
    }

    pub(crate) fn from_registry(registry: &BodyRegistry) -> Self {
        Self {
            names: registry.iter().map(|b| b.name.clone()).collect(),
            colors: registry.iter().map(|b| b.color).collect(),
            states: registry.states(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn states(&self) -> &[BodyState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Parameters of one prediction run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRequest {
    /// Points per path, including the starting position
    pub steps: usize,
    /// Simulated seconds between points
    pub dt: f64,
    /// Body whose co-moving frame the paths are expressed in
    pub reference: Option<usize>,
}

impl TrajectoryRequest {
    pub fn new(steps: usize, dt: f64) -> Self {
        Self {
            steps,
            dt,
            reference: None,
        }
    }

    pub fn relative_to(mut self, reference: usize) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn validate(&self, body_count: usize, max_steps: usize) -> Result<()> {
        if self.steps == 0 {
            return Err(SimError::InvalidRequest("step count must be at least 1".into()));
        }
        if self.steps > max_steps {
            return Err(SimError::InvalidRequest(format!(
                "step count {} exceeds the limit of {}",
                self.steps, max_steps
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidRequest(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if let Some(reference) = self.reference {
            if reference >= body_count {
                return Err(SimError::InvalidRequest(format!(
                    "reference body {} out of range for {} bodies",
                    reference, body_count
                )));
            }
        }
        Ok(())
    }
}

/// Predicted path of every body, in snapshot order
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectories {
    names: Vec<String>,
    colors: Vec<[f32; 4]>,
    paths: Vec<Vec<DVec3>>,
    reference: Option<usize>,
}

impl Trajectories {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn path(&self, index: usize) -> &[DVec3] {
        &self.paths[index]
    }

    pub fn path_by_name(&self, name: &str) -> Option<&[DVec3]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.paths[i].as_slice())
    }

    pub fn reference(&self) -> Option<usize> {
        self.reference
    }

    /// `(name, colour, path)` for every body
    pub fn iter(&self) -> impl Iterator<Item = (&str, [f32; 4], &[DVec3])> {
        self.names
            .iter()
            .zip(&self.colors)
            .zip(&self.paths)
            .map(|((name, color), path)| (name.as_str(), *color, path.as_slice()))
    }
}

/// Forward-simulate `snapshot` and collect one path per body
pub fn predict(snapshot: &Snapshot, request: &TrajectoryRequest, g: f64) -> Result<Trajectories> {
    predict_bounded(snapshot, request, g, DEFAULT_MAX_STEPS)
}

fn predict_bounded(
    snapshot: &Snapshot,
    request: &TrajectoryRequest,
    g: f64,
    max_steps: usize,
) -> Result<Trajectories> {
    request.validate(snapshot.len(), max_steps)?;

    let mut states = snapshot.states.clone();
    let n = states.len();
    let mut paths: Vec<Vec<DVec3>> = states
        .iter()
        .map(|s| {
            let mut path = Vec::with_capacity(request.steps);
            path.push(s.position);
            path
        })
        .collect();

    let reference_origin = request.reference.map(|k| states[k].position);

    for _ in 1..request.steps {
        verlet::step(&mut states, request.dt, g);

        // Shift everything by the reference body's displacement so far
        let shift = match (request.reference, reference_origin) {
            (Some(k), Some(origin)) => origin - states[k].position,
            _ => DVec3::ZERO,
        };

        for (i, (path, state)) in paths.iter_mut().zip(&states).enumerate() {
            match reference_origin {
                Some(origin) if request.reference == Some(i) => path.push(origin),
                _ => path.push(state.position + shift),
            }
        }
    }

    log::trace!(
        "predicted {} paths of {} points (dt {} s, reference {:?})",
        n,
        request.steps,
        request.dt,
        request.reference
    );

    Ok(Trajectories {
        names: snapshot.names.clone(),
        colors: snapshot.colors.clone(),
        paths,
        reference: request.reference,
    })
}

/// Prediction settings bundled for repeated use
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPredictor {
    pub g: f64,
    pub max_steps: usize,
}

impl TrajectoryPredictor {
    pub fn new(g: f64) -> Self {
        Self {
            g,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn predict(&self, snapshot: &Snapshot, request: &TrajectoryRequest) -> Result<Trajectories> {
        predict_bounded(snapshot, request, self.g, self.max_steps)
    }
}
