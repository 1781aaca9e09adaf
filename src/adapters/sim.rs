//! In-memory hardware simulation.
//!
//! Every adapter is a cheap cloneable handle over shared interior state,
//! mirroring how two code paths on real hardware can observe the same
//! register bit. The handles implement the port traits in [`crate::hal`];
//! the extra inherent methods (`drive_external`, `reset_pulses`, …) are
//! the test/bench instrumentation a register window would give you.
//!
//! [`SimClock`] ties it together for scenario runs: it advances virtual
//! time in 0.128 ms hardware ticks and reports which interrupt vectors
//! the tick generated, which the scenario loop pushes into the vector
//! queue. The PWM busy-wait delay advances the same clock, so foreground
//! blocking and interrupt timing share one timeline.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::hal::{AnalogInput, ByteStore, DigitalPin, EdgeIrqCtl, WatchdogHw, WatchdogPeriod};

// ───────────────────────────────────────────────────────────────
// Digital pin
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PinState {
    output: bool,
    /// Driven level (output) or pull-up state (input).
    latch: bool,
    /// Level imposed by the outside world (switch, wire), if any.
    external: Option<bool>,
}

/// One simulated digital pin. Clones share the same pin.
#[derive(Debug, Clone, Default)]
pub struct SimPin(Rc<RefCell<PinState>>);

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Impose an external level on the line (e.g. a switch closing).
    pub fn drive_external(&self, level: bool) {
        self.0.borrow_mut().external = Some(level);
    }

    /// Stop driving the line externally; it falls back to the latch.
    pub fn release_external(&self) {
        self.0.borrow_mut().external = None;
    }

    /// Whether the pin is configured as an output.
    pub fn is_output(&self) -> bool {
        self.0.borrow().output
    }
}

impl DigitalPin for SimPin {
    fn read_level(&self) -> bool {
        let s = self.0.borrow();
        if s.output {
            s.latch
        } else {
            // Input: the external driver wins over the pull-up.
            s.external.unwrap_or(s.latch)
        }
    }

    fn set_level(&mut self, high: bool) {
        self.0.borrow_mut().latch = high;
    }

    fn set_direction(&mut self, output: bool) {
        self.0.borrow_mut().output = output;
    }
}

// ───────────────────────────────────────────────────────────────
// Port-group edge interrupt mask
// ───────────────────────────────────────────────────────────────

/// Edge-interrupt mask for one simulated port group.
#[derive(Debug, Clone, Default)]
pub struct SimPort(Rc<RefCell<bool>>);

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EdgeIrqCtl for SimPort {
    fn enable_edge_interrupts(&mut self) {
        *self.0.borrow_mut() = true;
    }

    fn disable_edge_interrupts(&mut self) {
        *self.0.borrow_mut() = false;
    }

    fn edge_interrupts_enabled(&self) -> bool {
        *self.0.borrow()
    }
}

// ───────────────────────────────────────────────────────────────
// Analog input
// ───────────────────────────────────────────────────────────────

/// One simulated 10-bit analog channel. Set the value from the scenario,
/// sample it from the PWM driver.
#[derive(Debug, Clone, Default)]
pub struct SimAdc(Rc<RefCell<u16>>);

impl SimAdc {
    pub fn new(value: u16) -> Self {
        Self(Rc::new(RefCell::new(value.min(1023))))
    }

    pub fn set_value(&self, value: u16) {
        *self.0.borrow_mut() = value.min(1023);
    }
}

impl AnalogInput for SimAdc {
    fn sample(&mut self) -> u16 {
        *self.0.borrow()
    }
}

// ───────────────────────────────────────────────────────────────
// EEPROM
// ───────────────────────────────────────────────────────────────

/// Byte-store capacity, matching a 1 KiB EEPROM part.
pub const SIM_EEPROM_SIZE: usize = 1024;

/// Simulated EEPROM. Clones share the same cells.
#[derive(Debug, Clone)]
pub struct SimEeprom(Rc<RefCell<[u8; SIM_EEPROM_SIZE]>>);

impl SimEeprom {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new([0; SIM_EEPROM_SIZE])))
    }
}

impl Default for SimEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for SimEeprom {
    fn write(&mut self, address: u16, value: u8) -> bool {
        match self.0.borrow_mut().get_mut(usize::from(address)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    fn read(&self, address: u16) -> u8 {
        self.0
            .borrow()
            .get(usize::from(address))
            .copied()
            .unwrap_or(0)
    }
}

// ───────────────────────────────────────────────────────────────
// Watchdog countdown
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct WatchdogState {
    period_ticks: u64,
    remaining_ticks: u64,
    armed: bool,
    interrupt_mode: bool,
    reset_pulses: u32,
}

/// Simulated hardware watchdog. Clones share the same countdown.
#[derive(Debug, Clone, Default)]
pub struct SimWatchdog(Rc<RefCell<WatchdogState>>);

/// Hardware ticks (0.128 ms) per millisecond, expressed as a ratio.
const TICKS_PER_MS_NUM: u64 = 1000;
const TICKS_PER_MS_DEN: u64 = 128;

impl SimWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Liveness pulses received since construction.
    pub fn reset_pulses(&self) -> u32 {
        self.0.borrow().reset_pulses
    }

    /// Whether interrupt mode is currently selected.
    pub fn interrupt_mode(&self) -> bool {
        self.0.borrow().interrupt_mode
    }

    /// Advance the countdown by one 0.128 ms hardware tick. Returns `true`
    /// when the period expired on this tick in interrupt mode. Expiry
    /// restarts the countdown and clears interrupt mode, as the hardware
    /// does; the handler must re-select it or the next expiry is silent.
    pub fn tick(&self) -> bool {
        let mut s = self.0.borrow_mut();
        if !s.armed || s.period_ticks == 0 {
            return false;
        }
        s.remaining_ticks = s.remaining_ticks.saturating_sub(1);
        if s.remaining_ticks == 0 {
            s.remaining_ticks = s.period_ticks;
            if s.interrupt_mode {
                s.interrupt_mode = false;
                return true;
            }
        }
        false
    }
}

impl WatchdogHw for SimWatchdog {
    fn arm(&mut self, period: WatchdogPeriod) {
        let ticks = u64::from(period.as_ms()) * TICKS_PER_MS_NUM / TICKS_PER_MS_DEN;
        let mut s = self.0.borrow_mut();
        s.period_ticks = ticks;
        s.remaining_ticks = ticks;
        s.armed = true;
    }

    fn pulse_reset(&mut self) {
        let mut s = self.0.borrow_mut();
        s.remaining_ticks = s.period_ticks;
        s.reset_pulses += 1;
    }

    fn enable_interrupt_mode(&mut self) {
        self.0.borrow_mut().interrupt_mode = true;
    }
}

// ───────────────────────────────────────────────────────────────
// Virtual clock + busy-wait delay
// ───────────────────────────────────────────────────────────────

/// Virtual time in nanoseconds, shared between the delay port and the
/// scenario loop.
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<RefCell<u64>>);

/// One hardware tick in nanoseconds (0.128 ms).
pub const TICK_NS: u64 = 128_000;

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since start, microseconds.
    pub fn elapsed_us(&self) -> u64 {
        *self.0.borrow() / 1000
    }

    /// A [`DelayNs`] handle advancing this clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Advance virtual time directly (idle foreground spin).
    pub fn advance_us(&self, us: u64) {
        self.advance_ns(us * 1000);
    }

    fn advance_ns(&self, ns: u64) {
        *self.0.borrow_mut() += ns;
    }
}

/// Busy-wait delay over the virtual clock.
#[derive(Debug, Clone)]
pub struct SimDelay(SimClock);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance_ns(u64::from(ns));
    }
}
