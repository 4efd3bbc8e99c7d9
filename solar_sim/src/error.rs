//! Error types for the solar system engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that can occur while configuring or driving a simulation
///
/// Configuration errors are fatal to `Simulation::start`. Control and request
/// errors are raised by the caller-facing setters before anything reaches an
/// integrator. Coincident bodies are not an error: the gravity solver is
/// unsoftened and lets the non-finite result propagate.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("body `{0}` is defined more than once")]
    DuplicateBody(String),

    #[error("body `{name}` has invalid mass {mass} (must be finite and > 0)")]
    InvalidMass { name: String, mass: f64 },

    #[error("body `{name}` has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { name: String, radius: f64 },

    #[error("body `{name}` has invalid eccentricity {eccentricity} (must be finite and >= 0)")]
    InvalidEccentricity { name: String, eccentricity: f64 },

    #[error("body `{name}` has a non-finite {field}")]
    NonFinite { name: String, field: &'static str },

    #[error("body `{body}` orbits unknown body `{orbits}`")]
    UnknownBody { body: String, orbits: String },

    #[error("no root body named `{0}` without a parent")]
    MissingRoot(String),

    #[error("root body `{0}` must not orbit anything")]
    RootHasParent(String),

    #[error("bodies {0:?} have no orbited body but only the root may be parentless")]
    MultipleRoots(Vec<String>),

    #[error("orbit chain of body `{0}` never reaches the root")]
    OrbitCycle(String),

    #[error("body `{0}` has no well-defined orbital direction (coincident with its parent or position along the orbit normal)")]
    DegenerateOrbit(String),

    #[error("the body registry is empty")]
    Empty,

    #[error("simulation has not been started")]
    NotStarted,

    #[error("simulation has already been started")]
    AlreadyStarted,

    #[error("invalid {control}: {value} (allowed {min}..={max})")]
    InvalidControl {
        control: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid {control} limits {min}..={max} (bounds must be finite, positive and ordered)")]
    InvalidLimits {
        control: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid trajectory request: {0}")]
    InvalidRequest(String),

    #[error("unknown body `{0}`")]
    NoSuchBody(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
