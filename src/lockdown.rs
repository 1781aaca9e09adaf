//! The one-way lockdown flag.
//!
//! This is the only state shared between the watchdog supervisor and the
//! software PWM driver. It is monotonic: once engaged it stays engaged for
//! the rest of the boot session, which is what makes the terminal
//! transition race-free — every observer only ever sees `false → true`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared handle to the process-wide lockdown state.
///
/// Clones observe the same underlying flag. The supervisor's watchdog
/// handler is the only writer; the PWM driver (and anything else holding a
/// clone) only reads.
#[derive(Debug, Clone, Default)]
pub struct LockdownFlag(Arc<AtomicBool>);

impl LockdownFlag {
    /// A fresh, disengaged flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engage lockdown. One-way; there is no disengage.
    pub fn engage(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether lockdown has been engaged.
    pub fn engaged(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
