//! Newtonian gravity over the full body set
//!
//! There is no softening term. Two bodies at the same position give a
//! non-finite acceleration, which is left to propagate.

use crate::body::BodyState;
use glam::DVec3;

/// Net gravitational acceleration on `target` from every other body
pub fn acceleration_on(target: usize, states: &[BodyState], g: f64) -> DVec3 {
    let own = states[target].position;
    states
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(_, other)| {
            let r = other.position - own;
            (g * other.mass / r.length_squared()) * r.normalize()
        })
        .fold(DVec3::ZERO, |acc, a| acc + a)
}

/// Accelerations of every body from one fixed set of positions
///
/// Each pair is visited once and contributes to both of its bodies.
pub fn accelerations(states: &[BodyState], g: f64) -> Vec<DVec3> {
    let n = states.len();
    let mut accelerations = vec![DVec3::ZERO; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let r = states[j].position - states[i].position;
            let dist_sq = r.length_squared();
            let force_mag = g / dist_sq;
            let force_dir = r / dist_sq.sqrt();

            accelerations[i] += force_dir * force_mag * states[j].mass;
            accelerations[j] -= force_dir * force_mag * states[i].mass;
        }
    }

    accelerations
}

pub fn kinetic_energy(states: &[BodyState]) -> f64 {
    states.iter().map(BodyState::kinetic_energy).sum()
}

/// Gravitational potential energy, each pair counted once
pub fn potential_energy(states: &[BodyState], g: f64) -> f64 {
    states
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            states[i + 1..]
                .iter()
                .map(move |b| -g * a.mass * b.mass / a.position.distance(b.position))
        })
        .sum()
}

pub fn total_energy(states: &[BodyState], g: f64) -> f64 {
    kinetic_energy(states) + potential_energy(states, g)
}

/// Total angular momentum about the origin
pub fn angular_momentum(states: &[BodyState]) -> DVec3 {
    states
        .iter()
        .map(|s| s.position.cross(s.momentum()))
        .fold(DVec3::ZERO, |acc, l| acc + l)
}

pub fn linear_momentum(states: &[BodyState]) -> DVec3 {
    states
        .iter()
        .map(BodyState::momentum)
        .fold(DVec3::ZERO, |acc, p| acc + p)
}
