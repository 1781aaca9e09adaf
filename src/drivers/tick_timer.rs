//! Interrupt-driven tick timer.
//!
//! A hardware timer circuit generates one interrupt every 0.128 ms while
//! its interrupt is armed. This driver turns that raw tick stream into a
//! millisecond-scale timeout: at arming time the target tick count is
//! precomputed (`round(duration_ms / 0.128)`), each tick interrupt calls
//! [`TickTimer::count`], and [`TickTimer::elapsed`] reports `true` exactly
//! once per arming, resetting the counter for the next round. "Timeout" is
//! therefore a pure function of counted ticks — wall-clock jitter never
//! enters into it.
//!
//! Two instances exist: the one-shot debounce window (disarms itself on
//! expiry) and the periodic fault blink (stays armed and re-fires).

/// Time between timer-generated interrupts, in milliseconds.
pub const TICK_PERIOD_MS: f64 = 0.128;

/// Software countdown over an interrupt tick stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTimer {
    /// Ticks counted since the last expiry (or arming).
    counter: u32,
    /// Tick count at which the timer expires.
    target: u32,
    /// Whether the underlying hardware interrupt is unmasked.
    irq_enabled: bool,
}

impl TickTimer {
    /// New timer expiring after `duration_ms`; interrupt starts masked.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            counter: 0,
            target: ticks_for(duration_ms),
            irq_enabled: false,
        }
    }

    /// Record one tick interrupt.
    pub fn count(&mut self) {
        self.counter = self.counter.saturating_add(1);
    }

    /// `true` exactly once per arming when the target is reached; resets
    /// the counter for the next round.
    pub fn elapsed(&mut self) -> bool {
        if self.counter >= self.target {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Unmask the timer interrupt so ticks start arriving.
    pub fn enable_interrupt(&mut self) {
        self.irq_enabled = true;
    }

    /// Mask the timer interrupt.
    pub fn disable_interrupt(&mut self) {
        self.irq_enabled = false;
    }

    /// Flip the interrupt mask.
    pub fn toggle_interrupt(&mut self) {
        self.irq_enabled = !self.irq_enabled;
    }

    /// Whether the timer interrupt is unmasked.
    pub fn interrupt_enabled(&self) -> bool {
        self.irq_enabled
    }

    /// Back to the armed-but-unstarted state: interrupt masked, counter 0,
    /// target kept.
    pub fn reset(&mut self) {
        self.disable_interrupt();
        self.counter = 0;
    }

    /// Retarget the timer to a new duration. The running counter is kept,
    /// matching the hardware behaviour of rewriting a compare register.
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.target = ticks_for(duration_ms);
    }

    /// Full teardown: interrupt masked, counter and target zeroed. Used by
    /// the lockdown transition; a cleared timer never reports elapsed once
    /// its interrupt stays masked.
    pub fn clear(&mut self) {
        self.disable_interrupt();
        self.counter = 0;
        self.target = 0;
    }
}

/// Ticks needed for `duration_ms`, rounded half-up to the nearest integer.
fn ticks_for(duration_ms: f64) -> u32 {
    (duration_ms / TICK_PERIOD_MS + 0.5) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_target_rounds_half_up() {
        // 300 ms / 0.128 ms = 2343.75 → 2344.
        assert_eq!(ticks_for(300.0), 2344);
        // 50 ms / 0.128 ms = 390.625 → 391.
        assert_eq!(ticks_for(50.0), 391);
        assert_eq!(ticks_for(0.0), 0);
    }

    #[test]
    fn elapsed_fires_exactly_once_per_round() {
        let mut t = TickTimer::new(50.0);
        t.enable_interrupt();
        for _ in 0..390 {
            t.count();
            assert!(!t.elapsed());
        }
        t.count();
        assert!(t.elapsed());
        // Counter reset: the very next poll is false again.
        assert!(!t.elapsed());
    }

    #[test]
    fn periodic_rearm_counts_a_full_round_again() {
        let mut t = TickTimer::new(50.0);
        t.enable_interrupt();
        for round in 0..3 {
            for i in 0..391 {
                t.count();
                let expect = i == 390;
                assert_eq!(t.elapsed(), expect, "round {round}, tick {i}");
            }
        }
    }

    #[test]
    fn interrupt_mask_toggles() {
        let mut t = TickTimer::new(300.0);
        assert!(!t.interrupt_enabled());
        t.toggle_interrupt();
        assert!(t.interrupt_enabled());
        t.toggle_interrupt();
        assert!(!t.interrupt_enabled());
    }

    #[test]
    fn reset_keeps_target_clears_progress() {
        let mut t = TickTimer::new(50.0);
        t.enable_interrupt();
        for _ in 0..200 {
            t.count();
        }
        t.reset();
        assert!(!t.interrupt_enabled());
        // A full round is needed again.
        t.enable_interrupt();
        for _ in 0..390 {
            t.count();
            assert!(!t.elapsed());
        }
        t.count();
        assert!(t.elapsed());
    }

    #[test]
    fn set_duration_retargets() {
        let mut t = TickTimer::new(300.0);
        t.set_duration(50.0);
        t.enable_interrupt();
        for _ in 0..391 {
            t.count();
        }
        assert!(t.elapsed());
    }

    #[test]
    fn clear_tears_down() {
        let mut t = TickTimer::new(300.0);
        t.enable_interrupt();
        t.count();
        t.clear();
        assert!(!t.interrupt_enabled());
        // Target 0 plus a masked interrupt: never counted, so the cleared
        // timer is inert even though counter >= target holds.
        assert_eq!(t, TickTimer { counter: 0, target: 0, irq_enabled: false });
    }
}
