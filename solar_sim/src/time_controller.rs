//! Time controller: fixed physics ticks driven by wall-clock frames
//!
//! A physics tick always advances simulated time by `dt`. The speed factor
//! only changes how often ticks fire: one tick every
//! `base_tick_interval / speed_factor` real seconds.

use crate::error::{Result, SimError};
use common::constants::{DEFAULT_DT, DEFAULT_TICK_INTERVAL};
use common::units;
use serde::Deserialize;
use std::fmt;

/// Allowed ranges for the runtime controls
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlLimits {
    pub dt_min: f64,
    pub dt_max: f64,
    pub speed_min: f64,
    pub speed_max: f64,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            dt_min: 0.02,
            dt_max: 1728.0,
            speed_min: 0.02,
            speed_max: 200.0,
        }
    }
}

impl ControlLimits {
    /// Every bound finite and positive, each range non-empty
    pub fn validate(&self) -> Result<()> {
        check_bounds("dt", self.dt_min, self.dt_max)?;
        check_bounds("speed factor", self.speed_min, self.speed_max)
    }
}

/// Runtime controls plus elapsed-time bookkeeping
#[derive(Debug, Clone)]
pub struct TimeController {
    /// Wall-clock seconds per tick at speed factor 1
    base_tick_interval: f64,
    /// Simulated seconds per tick
    dt: f64,
    speed_factor: f64,
    paused: bool,
    /// Simulated seconds, interpolated between ticks
    elapsed: f64,
    /// Wall-clock seconds not yet consumed by a tick
    accumulator: f64,
    limits: ControlLimits,
}

impl TimeController {
    pub fn new() -> Self {
        Self {
            base_tick_interval: DEFAULT_TICK_INTERVAL,
            dt: DEFAULT_DT,
            speed_factor: 1.0,
            paused: false,
            elapsed: 0.0,
            accumulator: 0.0,
            limits: ControlLimits::default(),
        }
    }

    /// Create with explicit settings. `dt` and `base_tick_interval` only need
    /// to be positive here; the control limits apply to later changes.
    pub fn with_settings(
        base_tick_interval: f64,
        dt: f64,
        speed_factor: f64,
        limits: ControlLimits,
    ) -> Result<Self> {
        check_positive("tick interval", base_tick_interval)?;
        check_positive("dt", dt)?;
        check_positive("speed factor", speed_factor)?;
        limits.validate()?;
        Ok(Self {
            base_tick_interval,
            dt,
            speed_factor,
            limits,
            ..Self::new()
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f64) -> Result<()> {
        check_positive("dt", dt)?;
        check_range("dt", dt, self.limits.dt_min, self.limits.dt_max)?;
        self.dt = dt;
        Ok(())
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn set_speed_factor(&mut self, speed_factor: f64) -> Result<()> {
        check_positive("speed factor", speed_factor)?;
        check_range(
            "speed factor",
            speed_factor,
            self.limits.speed_min,
            self.limits.speed_max,
        )?;
        self.speed_factor = speed_factor;
        Ok(())
    }

    /// Multiply the speed factor by `increment`
    pub fn speed_up(&mut self, increment: f64) -> Result<()> {
        self.set_speed_factor(self.speed_factor * increment)
    }

    /// Divide the speed factor by `increment`
    pub fn slow_down(&mut self, increment: f64) -> Result<()> {
        self.set_speed_factor(self.speed_factor / increment)
    }

    pub fn limits(&self) -> ControlLimits {
        self.limits
    }

    pub fn base_tick_interval(&self) -> f64 {
        self.base_tick_interval
    }

    /// Wall-clock seconds between ticks
    pub fn tick_interval(&self) -> f64 {
        self.base_tick_interval / self.speed_factor
    }

    /// Simulated seconds per real second
    pub fn sim_rate(&self) -> f64 {
        self.dt / self.tick_interval()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Account for `wall_dt` real seconds of frame time
    ///
    /// Returns how many ticks are now due. Elapsed time is interpolated by
    /// the fraction of a tick this frame covers, so it moves smoothly between
    /// ticks. Nothing changes while paused.
    pub fn advance(&mut self, wall_dt: f64) -> u32 {
        if self.paused || !(wall_dt.is_finite() && wall_dt > 0.0) {
            return 0;
        }

        let interval = self.tick_interval();
        self.elapsed += self.dt * (wall_dt / interval);

        self.accumulator += wall_dt;
        let due = (self.accumulator / interval).floor();
        self.accumulator -= due * interval;
        due as u32
    }

    /// Real seconds it takes to show a full orbit of `period` simulated seconds
    pub fn orbit_wall_time(&self, period: f64) -> f64 {
        period * self.tick_interval() / self.dt
    }

    pub fn format_elapsed(&self) -> FormattedDuration {
        format_duration(self.elapsed)
    }

    /// Simulation rate, displayed with a `/sec` suffix
    pub fn format_rate(&self) -> String {
        format!("{}/sec", format_duration(self.sim_rate()))
    }
}

impl Default for TimeController {
    fn default() -> Self {
        Self::new()
    }
}

fn check_positive(control: &'static str, value: f64) -> Result<()> {
    check_range(control, value, f64::MIN_POSITIVE, f64::MAX)
}

fn check_bounds(control: &'static str, min: f64, max: f64) -> Result<()> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if positive(min) && positive(max) && min <= max {
        Ok(())
    } else {
        Err(SimError::InvalidLimits { control, min, max })
    }
}

fn check_range(control: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(SimError::InvalidControl {
            control,
            value,
            min,
            max,
        })
    }
}

/// Display unit picked for a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
}

impl TimeUnit {
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => units::MINUTE,
            TimeUnit::Hours => units::HOUR,
            TimeUnit::Days => units::DAY,
            TimeUnit::Months => units::MONTH,
            TimeUnit::Years => units::YEAR,
            TimeUnit::Decades => units::DECADE,
            TimeUnit::Centuries => units::CENTURY,
            TimeUnit::Millennia => units::MILLENNIUM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "Seconds",
            TimeUnit::Minutes => "Minutes",
            TimeUnit::Hours => "Hours",
            TimeUnit::Days => "Days",
            TimeUnit::Months => "Months",
            TimeUnit::Years => "Years",
            TimeUnit::Decades => "Decades",
            TimeUnit::Centuries => "Centuries",
            TimeUnit::Millennia => "Millennia",
        }
    }
}

/// A duration scaled to a readable unit, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormattedDuration {
    pub value: f64,
    pub unit: TimeUnit,
}

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.label())
    }
}

/// Express `seconds` in the largest unit it exceeds
pub fn format_duration(seconds: f64) -> FormattedDuration {
    const LARGEST_FIRST: [TimeUnit; 8] = [
        TimeUnit::Millennia,
        TimeUnit::Centuries,
        TimeUnit::Decades,
        TimeUnit::Years,
        TimeUnit::Months,
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
    ];

    let unit = LARGEST_FIRST
        .into_iter()
        .find(|unit| seconds / unit.seconds() > 1.0)
        .unwrap_or(TimeUnit::Seconds);

    FormattedDuration {
        value: (seconds / unit.seconds() * 100.0).round() / 100.0,
        unit,
    }
}
