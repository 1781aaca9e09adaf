//! Capability port traits — the boundary between the supervisor logic and
//! the hardware it runs on.
//!
//! ```text
//!   Adapter (MCU registers / host sim) ──▶ Port trait ──▶ drivers / supervisor
//! ```
//!
//! Every driver consumes these traits via generics, so the core logic never
//! touches a register directly and is fully exercisable against the in-memory
//! adapters in [`crate::adapters::sim`]. A target port implements the same
//! traits over the real peripherals.
//!
//! The busy-wait delay port is `embedded_hal::delay::DelayNs`; everything
//! else is narrow enough that a bespoke trait is clearer than forcing it
//! through a generic HAL shape.

// ───────────────────────────────────────────────────────────────
// Digital I/O
// ───────────────────────────────────────────────────────────────

/// One digital pin: logic-level read/write plus direction control.
///
/// For an input pin, `set_level(true)` engages the pull-up (AVR-style
/// shared output/pull-up register semantics).
pub trait DigitalPin {
    /// Current logical level of the pin.
    fn read_level(&self) -> bool;

    /// Drive the pin (output) or set the pull-up (input).
    fn set_level(&mut self, high: bool);

    /// `true` = output, `false` = input.
    fn set_direction(&mut self, output: bool);
}

/// Edge-interrupt mask for one whole port group.
///
/// Edge interrupts are masked per *group*, not per pin: suppressing the
/// liveness input during its debounce window silences every pin that
/// shares the group, exactly like pin-change interrupt hardware.
pub trait EdgeIrqCtl {
    /// Unmask edge interrupts for the group.
    fn enable_edge_interrupts(&mut self);

    /// Mask edge interrupts for the group.
    fn disable_edge_interrupts(&mut self);

    /// Whether edge interrupts are currently unmasked.
    fn edge_interrupts_enabled(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Analog input
// ───────────────────────────────────────────────────────────────

/// Highest raw sample the converter can return (10-bit).
pub const ANALOG_RAW_MAX: u16 = 1023;

/// One analog channel delivering 10-bit samples.
pub trait AnalogInput {
    /// Acquire one sample, `0..=1023`.
    fn sample(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Persistent byte storage
// ───────────────────────────────────────────────────────────────

/// Byte-addressed nonvolatile storage (EEPROM-like).
///
/// Failure semantics are fail-safe-by-default: an out-of-range write is a
/// no-op returning `false`, an out-of-range or uncommitted read returns 0.
/// Nothing here retries or propagates — a storage fault must never block
/// the lockdown path.
pub trait ByteStore {
    /// Write one byte. Returns `false` (no-op) if `address` is out of range.
    fn write(&mut self, address: u16, value: u8) -> bool;

    /// Read one byte. Returns 0 if `address` is out of range or never written.
    fn read(&self, address: u16) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Diagnostic console
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget diagnostic text output (serial terminal).
///
/// No backpressure, no errors: the supervisor reports and moves on.
pub trait Console {
    /// Write text without a trailing newline.
    fn write_str(&mut self, text: &str);

    /// Write text followed by a newline.
    fn write_line(&mut self, text: &str);

    /// Write an unsigned number without a trailing newline.
    fn write_number(&mut self, value: u32);
}

// ───────────────────────────────────────────────────────────────
// Hardware watchdog countdown
// ───────────────────────────────────────────────────────────────

/// Hardware watchdog periods (power-of-two milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WatchdogPeriod {
    Ms16,
    Ms32,
    Ms64,
    Ms128,
    Ms256,
    Ms512,
    Ms1024,
    Ms2048,
    Ms4096,
    Ms8192,
}

impl WatchdogPeriod {
    /// Nominal period in milliseconds.
    pub const fn as_ms(self) -> u32 {
        match self {
            Self::Ms16 => 16,
            Self::Ms32 => 32,
            Self::Ms64 => 64,
            Self::Ms128 => 128,
            Self::Ms256 => 256,
            Self::Ms512 => 512,
            Self::Ms1024 => 1024,
            Self::Ms2048 => 2048,
            Self::Ms4096 => 4096,
            Self::Ms8192 => 8192,
        }
    }
}

/// The hardware countdown device.
///
/// Once armed, `pulse_reset()` must be called at least once per period or
/// the device fires. In interrupt mode a firing is delivered as a
/// [`WatchdogTimeout`](crate::events::InterruptVector::WatchdogTimeout)
/// vector instead of a hard reset.
pub trait WatchdogHw {
    /// Configure the countdown period and start counting.
    fn arm(&mut self, period: WatchdogPeriod);

    /// Restart the countdown (the liveness signal).
    fn pulse_reset(&mut self);

    /// Select interrupt mode. Idempotent; the timeout handler re-invokes
    /// this unconditionally on exit so a fresh timeout is always detectable.
    fn enable_interrupt_mode(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watchdog_periods_are_powers_of_two_ms() {
        let all = [
            WatchdogPeriod::Ms16,
            WatchdogPeriod::Ms32,
            WatchdogPeriod::Ms64,
            WatchdogPeriod::Ms128,
            WatchdogPeriod::Ms256,
            WatchdogPeriod::Ms512,
            WatchdogPeriod::Ms1024,
            WatchdogPeriod::Ms2048,
            WatchdogPeriod::Ms4096,
            WatchdogPeriod::Ms8192,
        ];
        for p in all {
            assert!(p.as_ms().is_power_of_two());
        }
        assert_eq!(WatchdogPeriod::Ms8192.as_ms(), 8192);
    }
}
