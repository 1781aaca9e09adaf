//! Software PWM driver.
//!
//! Generates a duty-cycle signal in software: once per call, sample the
//! analog input, split the period into on/off time proportionally, then
//! hold the actuator active and inactive for those times using the busy-
//! wait delay port. The call is deliberately synchronous — it occupies the
//! foreground loop for one full period and is the sole driver of timing
//! for its actuator while it runs. The system has exactly one output
//! consumer, so nothing competes for the delay primitive.
//!
//! The driver is independent of the watchdog supervisor except for the
//! shared [`LockdownFlag`]: when lockdown engages, the next `run_once`
//! call latches the driver disabled and forces the actuator off.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::hal::{ANALOG_RAW_MAX, AnalogInput};
use crate::lockdown::LockdownFlag;

/// Period used when the configured period is zero.
pub const DEFAULT_PERIOD_US: u32 = 10_000;

/// Actuator pair the PWM driver toggles each cycle.
pub trait PwmOutput {
    /// Drive the actuator to its active level.
    fn set_active(&mut self);

    /// Drive the actuator to its inactive ("off") level.
    fn set_inactive(&mut self);
}

impl<P: crate::hal::DigitalPin> PwmOutput for super::indicator::IndicatorBank<P> {
    fn set_active(&mut self) {
        self.all_on();
    }

    fn set_inactive(&mut self) {
        self.all_off();
    }
}

/// One software PWM channel.
pub struct SoftPwm<A, O, D>
where
    A: AnalogInput,
    O: PwmOutput,
    D: DelayNs,
{
    input: A,
    output: O,
    delay: D,
    period_us: u32,
    on_us: u32,
    off_us: u32,
    enabled: bool,
    lockdown: LockdownFlag,
}

impl<A, O, D> SoftPwm<A, O, D>
where
    A: AnalogInput,
    O: PwmOutput,
    D: DelayNs,
{
    /// Wire a channel to an analog source and an actuator pair.
    /// A `period_us` of 0 selects [`DEFAULT_PERIOD_US`]. Starts `ENABLED`.
    pub fn new(input: A, output: O, delay: D, period_us: u32, lockdown: LockdownFlag) -> Self {
        let period_us = if period_us == 0 { DEFAULT_PERIOD_US } else { period_us };
        Self {
            input,
            output,
            delay,
            period_us,
            on_us: 0,
            off_us: 0,
            enabled: true,
            lockdown,
        }
    }

    /// Sample the analog input and run one full on/off cycle.
    ///
    /// Duty cycle is the raw 10-bit sample over 1023.0; on-time is that
    /// fraction of the period rounded half-up, off-time the exact
    /// remainder. No-op while disabled or locked down.
    pub fn run_once(&mut self) {
        if !self.gate() {
            return;
        }
        let raw = self.input.sample().min(ANALOG_RAW_MAX);
        let duty = f64::from(raw) / f64::from(ANALOG_RAW_MAX);
        self.split_period(duty);
        self.run_cycle();
    }

    /// Run one cycle with an explicitly supplied duty-cycle fraction in
    /// `[0, 1]` instead of sampling. Out-of-range fractions are a silent
    /// no-op — actuator state and the stored split are left untouched.
    pub fn run_once_with_duty_cycle(&mut self, duty: f64) {
        if !self.gate() {
            return;
        }
        if !(0.0..=1.0).contains(&duty) {
            debug!("pwm: duty cycle {duty} outside [0, 1], ignoring");
            return;
        }
        self.split_period(duty);
        self.run_cycle();
    }

    /// Allow `run_once` to drive the actuator again.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop driving and force the actuator to its off level immediately.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.output.set_inactive();
    }

    /// Flip between enabled and disabled.
    pub fn toggle(&mut self) {
        if self.enabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current on-time (microseconds) from the last duty computation.
    pub fn on_us(&self) -> u32 {
        self.on_us
    }

    /// Current off-time (microseconds) from the last duty computation.
    pub fn off_us(&self) -> u32 {
        self.off_us
    }

    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    // Latches the lockdown flag into a permanent disable (forcing the
    // actuator off the first time), then reports whether a cycle may run.
    fn gate(&mut self) -> bool {
        if self.lockdown.engaged() {
            if self.enabled {
                debug!("pwm: lockdown engaged, disabling channel");
                self.disable();
            }
            return false;
        }
        self.enabled
    }

    fn split_period(&mut self, duty: f64) {
        self.on_us = (duty * f64::from(self.period_us) + 0.5) as u32;
        self.off_us = self.period_us - self.on_us;
    }

    fn run_cycle(&mut self) {
        self.output.set_active();
        self.delay.delay_us(self.on_us);
        self.output.set_inactive();
        self.delay.delay_us(self.off_us);
    }
}
