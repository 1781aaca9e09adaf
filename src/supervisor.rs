//! Debounce/liveness/watchdog supervisor.
//!
//! One context struct owns every piece of cross-handler state — the
//! debounce gate, both tick timers, the timeout counter, and the lockdown
//! flag — and each interrupt vector is handled by exactly one method on
//! it. Field ownership is partitioned per subsystem: only the edge and
//! debounce handlers touch the gate, only the watchdog handler touches
//! the counter and the lockdown flag, only the blink handler touches the
//! fault indicator. No handler reaches into another's counters, which is
//! what makes arbitrary interleaving of the three sources safe.
//!
//! ```text
//!            edge            debounce expiry
//! NORMAL ──────────▶ DEBOUNCE_SUPPRESSED ──────────▶ NORMAL
//!    │                        │
//!    │  watchdog expiry,      │ watchdog expiry,
//!    │  count == max          │ count == max
//!    ▼                        ▼
//!              LOCKDOWN  (terminal; fault blink)
//! ```
//!
//! Race freedom in brief: the debounce window masks edge interrupts for
//! its own duration, so the edge and expiry handlers never interleave on
//! the gate; the edge handler's watchdog pulse-reset is a commutative
//! countdown clear, not a counter mutation, so ordering against the
//! timeout handler cannot corrupt the count; and the lockdown transition
//! is guarded by the monotonic flag checked at the top of the timeout
//! handler, so spurious re-entry is a no-op. Unlike masked hardware
//! interrupts, a vector already latched in the dispatch queue when its
//! timer gets masked is still delivered afterwards; both tick handlers
//! therefore drop ticks while their timer's interrupt is masked, which
//! keeps the lockdown teardown terminal under any delivery order.

use log::{debug, info};

use crate::config::SupervisorConfig;
use crate::drivers::button::LivenessButton;
use crate::drivers::indicator::Indicator;
use crate::drivers::tick_timer::TickTimer;
use crate::events::InterruptVector;
use crate::hal::{ByteStore, Console, DigitalPin, EdgeIrqCtl, WatchdogHw, WatchdogPeriod};
use crate::lockdown::LockdownFlag;
use crate::storage::TimeoutCounter;

/// The supervisor context: single owner of all cross-handler state.
pub struct Supervisor<P, G, F, W, S, C>
where
    P: DigitalPin,
    G: EdgeIrqCtl,
    F: DigitalPin,
    W: WatchdogHw,
    S: ByteStore,
    C: Console,
{
    // -- Debounce gate (edge + debounce handlers only) --
    button: LivenessButton<P, G>,
    debounce: TickTimer,

    // -- Watchdog state (timeout handler only) --
    watchdog: W,
    watchdog_period: WatchdogPeriod,
    timeouts: TimeoutCounter<S>,
    timeout_max: u8,
    lockdown: LockdownFlag,

    // -- Fault indicator (blink handler only) --
    blink: TickTimer,
    fault_led: Indicator<F>,

    // -- Diagnostics (any handler, fire-and-forget) --
    console: C,
}

impl<P, G, F, W, S, C> Supervisor<P, G, F, W, S, C>
where
    P: DigitalPin,
    G: EdgeIrqCtl,
    F: DigitalPin,
    W: WatchdogHw,
    S: ByteStore,
    C: Console,
{
    /// Assemble the supervisor from its wired parts. Nothing is armed
    /// until [`Self::start`].
    pub fn new(
        config: &SupervisorConfig,
        button: LivenessButton<P, G>,
        fault_led: Indicator<F>,
        watchdog: W,
        timeouts: TimeoutCounter<S>,
        console: C,
        lockdown: LockdownFlag,
    ) -> Self {
        Self {
            button,
            debounce: TickTimer::new(f64::from(config.debounce_window_ms)),
            watchdog,
            watchdog_period: config.watchdog_period,
            timeouts,
            timeout_max: config.timeout_max,
            lockdown,
            blink: TickTimer::new(f64::from(config.blink_interval_ms)),
            fault_led,
            console,
        }
    }

    /// Arm the system: watchdog counting in interrupt mode, edge
    /// interrupts unmasked. Call once after construction.
    pub fn start(&mut self) {
        self.watchdog.arm(self.watchdog_period);
        self.watchdog.enable_interrupt_mode();
        self.button.unmask_edges();
        info!(
            "supervisor armed: watchdog {} ms, {} timeouts to lockdown",
            self.watchdog_period.as_ms(),
            self.timeout_max
        );
    }

    /// Route one interrupt vector to its handler.
    pub fn dispatch(&mut self, vector: InterruptVector) {
        match vector {
            InterruptVector::PinChange => self.on_input_edge(),
            InterruptVector::DebounceTick => self.on_debounce_tick(),
            InterruptVector::BlinkTick => self.on_blink_tick(),
            InterruptVector::WatchdogTimeout => self.on_watchdog_timeout(),
        }
    }

    // ── Handlers (one interrupt source each) ──────────────────

    /// Edge on the liveness input, either polarity.
    ///
    /// Masks the whole port group for the debounce window so a bouncing
    /// contact cannot re-enter, then qualifies the edge: only if the input
    /// reads active right now does it count as a liveness signal. Press
    /// and release edges are otherwise treated identically (matching the
    /// commissioned hardware; see DESIGN.md).
    pub fn on_input_edge(&mut self) {
        self.button.mask_edges();
        self.debounce.enable_interrupt();

        if self.button.is_pressed() {
            self.watchdog.pulse_reset();
            self.console.write_line("Watchdog timer reset!");
            debug!("liveness reset");
        }
    }

    /// One debounce-timer tick (0.128 ms granularity).
    ///
    /// On window expiry, reopens the gate: edge interrupts unmasked, the
    /// one-shot timer disarms itself. A tick latched before the timer was
    /// masked can still be delivered; a masked timer drops it, so a stale
    /// tick after the lockdown teardown cannot reopen the gate.
    pub fn on_debounce_tick(&mut self) {
        if !self.debounce.interrupt_enabled() {
            return;
        }
        self.debounce.count();
        if self.debounce.elapsed() {
            self.button.unmask_edges();
            self.debounce.disable_interrupt();
        }
    }

    /// One fault-blink-timer tick. Armed only after lockdown; toggles the
    /// fault indicator at the configured rate. Ticks while the timer is
    /// masked are dropped.
    pub fn on_blink_tick(&mut self) {
        if !self.blink.interrupt_enabled() {
            return;
        }
        self.blink.count();
        if self.blink.elapsed() {
            self.fault_led.toggle();
        }
    }

    /// Watchdog countdown expired: no liveness reset within the period.
    ///
    /// Below the maximum the new count is persisted and the supervisor
    /// carries on; at the maximum the terminal lockdown runs exactly once.
    /// The hardware interrupt is re-armed on every exit path so a fresh
    /// timeout stays detectable even mid-teardown.
    pub fn on_watchdog_timeout(&mut self) {
        if !self.lockdown.engaged() {
            let count = self.timeouts.increment();

            self.console.write_str("Number of timeouts: ");
            self.console.write_number(u32::from(count));
            self.console.write_line("");

            if count >= self.timeout_max {
                self.enter_lockdown();
            } else {
                self.timeouts.persist();
            }
        }

        self.watchdog.enable_interrupt_mode();
    }

    // One-way terminal transition. Reached only via the guarded path
    // above, so it runs at most once per boot session.
    fn enter_lockdown(&mut self) {
        self.lockdown.engage();
        self.console.write_line("Maximum number of timeouts has elapsed!");
        self.console.write_line("System lockdown!");
        info!("lockdown engaged after {} timeouts", self.timeouts.count());

        // Tear down normal operation: no more edges, no debounce window,
        // and the PWM driver latches itself off via the shared flag.
        self.button.clear();
        self.debounce.clear();

        // The fault indicator takes over.
        self.blink.enable_interrupt();
    }

    // ── Observers (dispatch loop + tests) ─────────────────────

    /// Whether the boot session has reached the terminal state.
    pub fn is_locked_down(&self) -> bool {
        self.lockdown.engaged()
    }

    /// Whether the debounce window is currently suppressing edges.
    pub fn debounce_suppressing(&self) -> bool {
        self.debounce.interrupt_enabled()
    }

    /// Whether the fault-blink timer is armed (ticks wanted).
    pub fn blink_armed(&self) -> bool {
        self.blink.interrupt_enabled()
    }

    /// Whether edge interrupts are unmasked on the input's port group.
    pub fn edges_unmasked(&self) -> bool {
        self.button.edges_unmasked()
    }

    /// Timeouts counted this boot session.
    pub fn timeout_count(&self) -> u8 {
        self.timeouts.count()
    }

    /// What the byte store holds at the counter address.
    pub fn persisted_timeout_count(&self) -> u8 {
        self.timeouts.persisted()
    }
}
