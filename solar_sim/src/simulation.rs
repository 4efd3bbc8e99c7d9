//! The live simulation: body registry, controls and the fixed-step integrator

use crate::body::CelestialBody;
use crate::error::{Result, SimError};
use crate::gravity;
use crate::initial_state;
use crate::orbit_period;
use crate::registry::BodyRegistry;
use crate::time_controller::TimeController;
use crate::trajectory::Snapshot;
use crate::verlet;

/// Lifecycle of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Bodies registered, initial velocities not yet solved
    Uninitialized,
    /// Initial state solved, no tick taken yet
    Ready,
    Stepping,
    Paused,
}

/// Simulation context owning the bodies and every runtime control
///
/// Ticks are strictly serialised: each one finishes its position update,
/// acceleration refresh and velocity update before the next can start.
pub struct Simulation {
    registry: BodyRegistry,
    time: TimeController,
    g: f64,
    phase: Phase,
    ticks: u64,
}

impl Simulation {
    pub fn new(registry: BodyRegistry, time: TimeController, g: f64) -> Self {
        Self {
            registry,
            time,
            g,
            phase: Phase::Uninitialized,
            ticks: 0,
        }
    }

    /// Solve initial velocities, a(t = 0) and orbit periods
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            return Err(SimError::AlreadyStarted);
        }

        initial_state::initialize(&mut self.registry, self.g)?;
        orbit_period::assign_orbit_periods(&mut self.registry, self.g);

        self.phase = if self.time.is_paused() {
            Phase::Paused
        } else {
            Phase::Ready
        };
        log::info!(
            "started {} bodies around `{}`, dt {} s, tick every {} s",
            self.registry.len(),
            self.registry.root().name,
            self.time.dt(),
            self.time.tick_interval()
        );
        Ok(())
    }

    /// Run one physics tick
    ///
    /// Returns `Ok(false)` without touching any state while paused.
    pub fn tick(&mut self) -> Result<bool> {
        if self.phase == Phase::Uninitialized {
            return Err(SimError::NotStarted);
        }
        if self.time.is_paused() {
            return Ok(false);
        }

        let mut states = self.registry.states();
        verlet::step(&mut states, self.time.dt(), self.g);
        self.registry.apply_states(&states);

        self.ticks += 1;
        self.phase = Phase::Stepping;
        log::trace!("tick {} (dt {} s)", self.ticks, self.time.dt());
        Ok(true)
    }

    /// Account for one rendered frame of `wall_dt` real seconds and run the
    /// ticks that fall due. Returns the number of ticks taken.
    pub fn advance(&mut self, wall_dt: f64) -> Result<u32> {
        if self.phase == Phase::Uninitialized {
            return Err(SimError::NotStarted);
        }
        let due = self.time.advance(wall_dt);
        for _ in 0..due {
            self.tick()?;
        }
        Ok(due)
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.time.pause();
        } else {
            self.time.resume();
        }
        self.sync_phase();
    }

    pub fn toggle_pause(&mut self) {
        self.time.toggle_pause();
        self.sync_phase();
    }

    fn sync_phase(&mut self) {
        self.phase = match self.phase {
            Phase::Uninitialized => Phase::Uninitialized,
            _ if self.time.is_paused() => Phase::Paused,
            _ if self.ticks > 0 => Phase::Stepping,
            _ => Phase::Ready,
        };
    }

    pub fn is_paused(&self) -> bool {
        self.time.is_paused()
    }

    pub fn set_speed_factor(&mut self, speed_factor: f64) -> Result<()> {
        self.time.set_speed_factor(speed_factor)
    }

    /// Multiply the speed factor by `increment`, within the control limits
    pub fn speed_up(&mut self, increment: f64) -> Result<()> {
        self.time.speed_up(increment)
    }

    pub fn slow_down(&mut self, increment: f64) -> Result<()> {
        self.time.slow_down(increment)
    }

    pub fn set_dt(&mut self, dt: f64) -> Result<()> {
        self.time.set_dt(dt)
    }

    /// Copy every body's current state for the trajectory predictor
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_registry(&self.registry)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        self.registry.bodies()
    }

    pub fn body(&self, name: &str) -> Option<&CelestialBody> {
        self.registry.get(name)
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    pub fn elapsed(&self) -> f64 {
        self.time.elapsed()
    }

    pub fn tick_interval(&self) -> f64 {
        self.time.tick_interval()
    }

    /// Real seconds needed to draw a whole orbit of `name` at the current rate
    pub fn orbit_wall_time(&self, name: &str) -> Option<f64> {
        let period = self.body(name)?.orbit_period?;
        Some(self.time.orbit_wall_time(period))
    }

    pub fn total_energy(&self) -> f64 {
        gravity::total_energy(&self.registry.states(), self.g)
    }
}
