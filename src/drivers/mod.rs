//! Peripheral drivers: liveness input, tick timers, indicators, and the
//! software PWM channel. All of them consume the port traits in
//! [`crate::hal`] and contain no target-specific code.

pub mod button;
pub mod indicator;
pub mod pwm;
pub mod tick_timer;
