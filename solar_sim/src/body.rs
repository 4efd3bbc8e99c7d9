//! Celestial body data model
//!
//! All quantities are SI: metres, kilograms, seconds. Angles in the
//! configuration (inclination, axial tilt) are degrees.

use glam::{DQuat, DVec3};

/// Normal of the reference orbital plane
pub const REFERENCE_UP: DVec3 = DVec3::Y;

/// Axis an orbit's inclination is applied about
pub const REFERENCE_RIGHT: DVec3 = DVec3::X;

/// Axis a body's axial tilt is applied about
pub const REFERENCE_FORWARD: DVec3 = DVec3::Z;

/// A star, planet or moon taking part in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub mass: f64,   // kg
    pub radius: f64, // m

    // Orbit, only meaningful when `orbits` is set
    pub eccentricity: f64,
    pub inclination: f64, // degrees
    pub orbits: Option<String>,

    pub axial_tilt: f64,      // degrees
    pub rotation_period: f64, // sidereal, seconds; negative for retrograde spin

    pub position: DVec3,     // m, root-centred inertial frame
    pub velocity: DVec3,     // m/s
    pub acceleration: DVec3, // m/s²

    /// Sidereal orbit period in seconds, filled in once at start
    pub orbit_period: Option<f64>,

    pub color: [f32; 4],
    pub ui_priority: i32,
}

impl CelestialBody {
    pub fn new(name: &str, mass: f64, radius: f64) -> Self {
        Self {
            name: name.to_string(),
            mass,
            radius,
            eccentricity: 0.0,
            inclination: 0.0,
            orbits: None,
            axial_tilt: 0.0,
            rotation_period: 0.0,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
            orbit_period: None,
            color: [1.0, 1.0, 1.0, 1.0],
            ui_priority: 0,
        }
    }

    /// Place the body on an orbit around `parent`
    pub fn orbiting(mut self, parent: &str, eccentricity: f64, inclination: f64) -> Self {
        self.orbits = Some(parent.to_string());
        self.eccentricity = eccentricity;
        self.inclination = inclination;
        self
    }

    /// Set the initial position. For orbiting bodies this must be an apsis.
    pub fn at(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, axial_tilt: f64, rotation_period: f64) -> Self {
        self.axial_tilt = axial_tilt;
        self.rotation_period = rotation_period;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_ui_priority(mut self, priority: i32) -> Self {
        self.ui_priority = priority;
        self
    }

    pub fn is_orbiting(&self) -> bool {
        self.orbits.is_some()
    }

    /// Normal of this body's orbital plane: the reference up axis rotated
    /// by minus the inclination about the reference right axis.
    pub fn orbit_normal(&self) -> DVec3 {
        DQuat::from_axis_angle(REFERENCE_RIGHT, (-self.inclination).to_radians()) * REFERENCE_UP
    }

    /// Axis the body spins about, tilted from the reference up axis
    pub fn spin_axis(&self) -> DVec3 {
        DQuat::from_axis_angle(REFERENCE_FORWARD, (-self.axial_tilt).to_radians()) * REFERENCE_UP
    }

    /// Spin angle in degrees, in `[0, 360)`, after `elapsed` simulated seconds
    pub fn spin_angle(&self, elapsed: f64) -> f64 {
        if self.rotation_period == 0.0 {
            return 0.0;
        }
        (360.0 * elapsed / self.rotation_period).rem_euclid(360.0)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn distance_to(&self, other: &CelestialBody) -> f64 {
        self.position.distance(other.position)
    }

    pub fn state(&self) -> BodyState {
        BodyState {
            mass: self.mass,
            position: self.position,
            velocity: self.velocity,
            acceleration: self.acceleration,
        }
    }

    pub fn set_state(&mut self, state: &BodyState) {
        self.position = state.position;
        self.velocity = state.velocity;
        self.acceleration = state.acceleration;
    }
}

/// The kinematic record the integrators step
///
/// Both the live simulation and the trajectory predictor work on slices of
/// these, never on `CelestialBody` directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub mass: f64,
    pub position: DVec3,
    pub velocity: DVec3,
    pub acceleration: DVec3,
}

impl BodyState {
    pub fn new(mass: f64, position: DVec3, velocity: DVec3) -> Self {
        Self {
            mass,
            position,
            velocity,
            acceleration: DVec3::ZERO,
        }
    }

    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
