//! Initial velocities from orbital elements
//!
//! A body starts at an apsis of its orbit around its parent. Its speed
//! relative to the parent is
//!
//!   v = sqrt(G M_parent (1 + e) / |r|)
//!
//! directed along `orbit_normal × r`, where `r` points from the body to the
//! parent. The parent's own initial velocity is then added so the orbit is
//! expressed in the root's inertial frame. The root is at rest.
//!
//! Velocities are resolved iteratively, top-down along each parent chain,
//! and memoised so a parent shared by many moons is solved once.

use crate::body::CelestialBody;
use crate::error::{Result, SimError};
use crate::registry::BodyRegistry;
use crate::verlet;
use glam::DVec3;

/// Velocity of `body` relative to `parent` for an orbit starting at an apsis
pub fn relative_orbit_velocity(body: &CelestialBody, parent: &CelestialBody, g: f64) -> Result<DVec3> {
    let r = parent.position - body.position;
    let direction = body
        .orbit_normal()
        .cross(r)
        .try_normalize()
        .ok_or_else(|| SimError::DegenerateOrbit(body.name.clone()))?;
    let speed = (g * parent.mass * (1.0 + body.eccentricity) / r.length()).sqrt();
    Ok(speed * direction)
}

/// Initial velocity of every body in registry order
pub fn solve_initial_velocities(registry: &BodyRegistry, g: f64) -> Result<Vec<DVec3>> {
    let n = registry.len();
    let mut resolved: Vec<Option<DVec3>> = vec![None; n];
    resolved[registry.root_index()] = Some(DVec3::ZERO);

    for index in 0..n {
        if resolved[index].is_some() {
            continue;
        }

        // Walk up to the first ancestor that is already known
        let mut pending = vec![index];
        let mut current = index;
        loop {
            let parent = registry
                .parent_index(current)
                .ok_or_else(|| SimError::OrbitCycle(registry.body(index).name.clone()))?;
            if resolved[parent].is_some() {
                break;
            }
            if pending.len() >= n {
                return Err(SimError::OrbitCycle(registry.body(index).name.clone()));
            }
            pending.push(parent);
            current = parent;
        }

        // Resolve from the top of the chain down
        for &body in pending.iter().rev() {
            let parent = registry
                .parent_index(body)
                .ok_or_else(|| SimError::OrbitCycle(registry.body(body).name.clone()))?;
            let parent_velocity = resolved[parent].unwrap_or(DVec3::ZERO);
            let relative = relative_orbit_velocity(registry.body(body), registry.body(parent), g)?;
            resolved[body] = Some(relative + parent_velocity);
        }
    }

    Ok(resolved
        .into_iter()
        .map(|v| v.unwrap_or(DVec3::ZERO))
        .collect())
}

/// Set every body's initial velocity, then a(t = 0) from the full body set
pub fn initialize(registry: &mut BodyRegistry, g: f64) -> Result<()> {
    let velocities = solve_initial_velocities(registry, g)?;
    for (index, velocity) in velocities.into_iter().enumerate() {
        let depth = registry.depth(index);
        let body = registry.body_mut(index);
        body.velocity = velocity;
        log::debug!(
            "{}: initial velocity {:.3e} m/s (depth {})",
            body.name,
            velocity.length(),
            depth
        );
    }

    let mut states = registry.states();
    verlet::prime(&mut states, g);
    registry.apply_states(&states);
    Ok(())
}
