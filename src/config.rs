//! System configuration parameters.
//!
//! All tunable parameters for the supervisor. Defaults carry the values
//! the hardware was commissioned with: a 300 ms debounce window, a 50 ms
//! fault blink, an 8192 ms watchdog period and five tolerated timeouts.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hal::WatchdogPeriod;

/// Core supervisor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    // --- Debounce ---
    /// Edge-interrupt suppression window after an input edge (milliseconds).
    pub debounce_window_ms: u16,

    // --- Watchdog ---
    /// Hardware watchdog countdown period.
    pub watchdog_period: WatchdogPeriod,
    /// Consecutive timeouts tolerated before lockdown.
    pub timeout_max: u8,
    /// Byte-store address holding the persisted timeout count.
    pub timeout_address: u16,

    // --- Lockdown fault indicator ---
    /// Fault-indicator blink interval once locked down (milliseconds).
    pub blink_interval_ms: u16,

    // --- Software PWM ---
    /// PWM output period (microseconds). 0 selects the driver default.
    pub pwm_period_us: u32,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 300,
            watchdog_period: WatchdogPeriod::Ms8192,
            timeout_max: 5,
            timeout_address: 100,
            blink_interval_ms: 50,
            pwm_period_us: 1000,
        }
    }
}

impl SupervisorConfig {
    /// Range-check the configuration before wiring anything to it.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_window_ms == 0 {
            return Err(Error::Config("debounce_window_ms must be nonzero"));
        }
        if self.timeout_max == 0 {
            return Err(Error::Config("timeout_max must be nonzero"));
        }
        if self.blink_interval_ms == 0 {
            return Err(Error::Config("blink_interval_ms must be nonzero"));
        }
        // The debounce window must close well inside one watchdog period,
        // or a press could mask edges past the next timeout.
        if u32::from(self.debounce_window_ms) >= self.watchdog_period.as_ms() {
            return Err(Error::Config(
                "debounce_window_ms must be shorter than the watchdog period",
            ));
        }
        Ok(())
    }
}
