//! Velocity Verlet stepping shared by the live simulation and the predictor
//!
//! 1. x(t + dt) = x(t) + v(t) dt + ½ a(t) dt²
//! 2. a(t + dt) from all of the new positions
//! 3. v(t + dt) = v(t) + ½ (a(t) + a(t + dt)) dt
//!
//! The stored acceleration of each state must hold a(t) on entry; `prime`
//! sets it up before the first step.

use crate::body::BodyState;
use crate::gravity;

/// Fill in the accelerations for the current positions
pub fn prime(states: &mut [BodyState], g: f64) {
    let accelerations = gravity::accelerations(states, g);
    for (state, acc) in states.iter_mut().zip(accelerations) {
        state.acceleration = acc;
    }
}

/// Advance every state by one step of `dt` seconds
pub fn step(states: &mut [BodyState], dt: f64, g: f64) {
    if states.is_empty() {
        return;
    }

    for state in states.iter_mut() {
        state.position += state.velocity * dt + 0.5 * state.acceleration * dt * dt;
    }

    // All positions are final before any acceleration is evaluated
    let new_accelerations = gravity::accelerations(states, g);

    for (state, new_acc) in states.iter_mut().zip(new_accelerations) {
        state.velocity += 0.5 * (state.acceleration + new_acc) * dt;
        state.acceleration = new_acc;
    }
}

/// Take `n_steps` steps
pub fn integrate(states: &mut [BodyState], dt: f64, n_steps: usize, g: f64) {
    for _ in 0..n_steps {
        step(states, dt, g);
    }
}
