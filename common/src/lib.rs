//! Common utilities for physics simulations
//!
//! This crate provides the physical constants, time units and logging setup
//! shared by the solar system engine and its headless driver.

use std::sync::Once;

/// Physical constants used in simulations
pub mod constants {
    /// Gravitational constant in m³/(kg·s²)
    pub const G: f64 = 6.67384e-11;

    /// Default simulated seconds advanced by one physics tick
    pub const DEFAULT_DT: f64 = 360.0;

    /// Default wall-clock seconds between physics ticks at speed factor 1
    pub const DEFAULT_TICK_INTERVAL: f64 = 0.02;

    /// Name of the body every orbit tree is rooted at
    pub const DEFAULT_ROOT_NAME: &str = "Sun";
}

/// Calendar units in seconds, used when formatting simulated durations
pub mod units {
    pub const MINUTE: f64 = 60.0;
    pub const HOUR: f64 = 3_600.0;
    pub const DAY: f64 = 86_400.0;
    /// A twelfth of a 365-day year
    pub const MONTH: f64 = 2_628_000.0;
    pub const YEAR: f64 = 31_536_000.0;
    pub const DECADE: f64 = 10.0 * YEAR;
    pub const CENTURY: f64 = 100.0 * YEAR;
    pub const MILLENNIUM: f64 = 1_000.0 * YEAR;
}

static LOGGER: Once = Once::new();

/// Initialise `env_logger`, defaulting to the `info` level when `RUST_LOG` is unset.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    LOGGER.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        if env_logger::Builder::from_env(env).try_init().is_err() {
            log::warn!("a global logger was already installed");
        }
    });
}
