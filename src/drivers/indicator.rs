//! Indicator (LED-class) actuator drivers.
//!
//! [`Indicator`] is one digital output with on/off/toggle; the supervisor
//! blinks one of these as the lockdown fault indicator. [`IndicatorBank`]
//! gangs several indicators so the software PWM driver can dim them as a
//! single actuator.

use heapless::Vec;

use crate::hal::DigitalPin;

/// Most indicators one bank can gang together.
pub const BANK_CAP: usize = 8;

/// One digital-output indicator.
pub struct Indicator<P: DigitalPin> {
    pin: P,
    lit: bool,
}

impl<P: DigitalPin> Indicator<P> {
    /// Wire the pin as an output, initially off.
    pub fn new(mut pin: P) -> Self {
        pin.set_direction(true);
        pin.set_level(false);
        Self { pin, lit: false }
    }

    pub fn on(&mut self) {
        self.pin.set_level(true);
        self.lit = true;
    }

    pub fn off(&mut self) {
        self.pin.set_level(false);
        self.lit = false;
    }

    pub fn toggle(&mut self) {
        if self.lit {
            self.off();
        } else {
            self.on();
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

/// A fixed-capacity group of indicators driven together.
pub struct IndicatorBank<P: DigitalPin> {
    members: Vec<Indicator<P>, BANK_CAP>,
}

impl<P: DigitalPin> IndicatorBank<P> {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Add an indicator to the bank. Silently ignores members beyond
    /// [`BANK_CAP`]; the board has three.
    pub fn push(&mut self, indicator: Indicator<P>) {
        let _ = self.members.push(indicator);
    }

    pub fn all_on(&mut self) {
        for m in &mut self.members {
            m.on();
        }
    }

    pub fn all_off(&mut self) {
        for m in &mut self.members {
            m.off();
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<P: DigitalPin> Default for IndicatorBank<P> {
    fn default() -> Self {
        Self::new()
    }
}
