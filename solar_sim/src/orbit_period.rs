//! Orbit periods from Kepler's third law
//!
//! The initial position is taken to be an apsis, so the semi-major axis is
//! `|r₀| / (1 - e)` with `r₀` measured from the origin. The controlling mass
//! is always the root's, which is only right for bodies orbiting the root
//! directly; a moon gets a period computed as if it circled the root.

use crate::body::CelestialBody;
use crate::registry::BodyRegistry;
use std::f64::consts::PI;

/// Semi-major axis in metres, `None` for an unbound (`e >= 1`) orbit
pub fn semi_major_axis(body: &CelestialBody) -> Option<f64> {
    if body.eccentricity >= 1.0 {
        return None;
    }
    Some(body.position.length() / (1.0 - body.eccentricity))
}

/// Sidereal period in seconds, `None` for the root and for unbound orbits
pub fn orbit_period(body: &CelestialBody, root_mass: f64, g: f64) -> Option<f64> {
    if !body.is_orbiting() {
        return None;
    }
    let a = semi_major_axis(body)?;
    Some(2.0 * PI * (a.powi(3) / (g * root_mass)).sqrt())
}

/// Fill in `orbit_period` for every body. Runs once, after positions are known.
pub fn assign_orbit_periods(registry: &mut BodyRegistry, g: f64) {
    let root_mass = registry.root().mass;
    for index in 0..registry.len() {
        let body = registry.body_mut(index);
        body.orbit_period = orbit_period(body, root_mass, g);

        match body.orbit_period {
            Some(period) => log::debug!("{}: orbit period {:.4e} s", body.name, period),
            None if body.is_orbiting() => log::warn!(
                "{}: eccentricity {} is not a bound orbit, no period assigned",
                body.name,
                body.eccentricity
            ),
            None => {}
        }
    }
}
