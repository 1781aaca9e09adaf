//! Fully wired supervisor over the in-memory simulation adapters, plus a
//! virtual-time stepper.
//!
//! Interrupt delivery is modelled directly: each 0.128 ms hardware tick
//! polls the simulated watchdog and the supervisor's armed timers, and
//! fired vectors are dispatched in controller priority order.  The
//! lock-free vector queue has its own unit tests; sharing its process-wide
//! statics between parallel test threads would cross-talk, so the rig
//! bypasses it.

use deadman::adapters::console::RecordingConsole;
use deadman::adapters::sim::{SimEeprom, SimPin, SimPort, SimWatchdog};
use deadman::config::SupervisorConfig;
use deadman::drivers::button::LivenessButton;
use deadman::drivers::indicator::Indicator;
use deadman::events::InterruptVector;
use deadman::hal::EdgeIrqCtl;
use deadman::lockdown::LockdownFlag;
use deadman::storage::TimeoutCounter;
use deadman::supervisor::Supervisor;

/// Hardware tick period, nanoseconds (0.128 ms).
const TICK_NS: u64 = 128_000;

pub type SimSupervisor =
    Supervisor<SimPin, SimPort, SimPin, SimWatchdog, SimEeprom, RecordingConsole>;

#[allow(dead_code)]
pub struct Rig {
    pub supervisor: SimSupervisor,
    pub button_pin: SimPin,
    pub port: SimPort,
    pub fault_pin: SimPin,
    pub watchdog: SimWatchdog,
    pub eeprom: SimEeprom,
    pub console: RecordingConsole,
    pub lockdown: LockdownFlag,
    pub config: SupervisorConfig,
    elapsed_ns: u64,
    ticked: u64,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(SupervisorConfig::default())
    }

    pub fn with_config(config: SupervisorConfig) -> Self {
        config.validate().expect("rig config must be valid");

        let button_pin = SimPin::new();
        let port = SimPort::new();
        let fault_pin = SimPin::new();
        let watchdog = SimWatchdog::new();
        let eeprom = SimEeprom::new();
        let console = RecordingConsole::new();
        let lockdown = LockdownFlag::new();

        let button = LivenessButton::new(button_pin.clone(), port.clone());
        let fault_led = Indicator::new(fault_pin.clone());
        let counter = TimeoutCounter::new_cold_boot(eeprom.clone(), config.timeout_address);

        let mut supervisor = Supervisor::new(
            &config,
            button,
            fault_led,
            watchdog.clone(),
            counter,
            console.clone(),
            lockdown.clone(),
        );
        supervisor.start();

        Self {
            supervisor,
            button_pin,
            port,
            fault_pin,
            watchdog,
            eeprom,
            console,
            lockdown,
            config,
            elapsed_ns: 0,
            ticked: 0,
        }
    }

    /// Close the active-low contact. Delivers the edge only while the
    /// port group is unmasked, as the interrupt controller would.
    pub fn press(&mut self) {
        self.button_pin.drive_external(false);
        self.edge();
    }

    /// Open the contact (line returns to the pull-up).
    pub fn release(&mut self) {
        self.button_pin.release_external();
        self.edge();
    }

    fn edge(&mut self) {
        if self.port.edge_interrupts_enabled() {
            self.supervisor.dispatch(InterruptVector::PinChange);
        }
    }

    /// Advance virtual time by exactly `n` hardware ticks.
    pub fn ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.ticked += 1;
            if self.watchdog.tick() {
                self.supervisor.dispatch(InterruptVector::WatchdogTimeout);
            }
            if self.supervisor.debounce_suppressing() {
                self.supervisor.dispatch(InterruptVector::DebounceTick);
            }
            if self.supervisor.blink_armed() {
                self.supervisor.dispatch(InterruptVector::BlinkTick);
            }
        }
        self.elapsed_ns = self.elapsed_ns.max(self.ticked * TICK_NS);
    }

    /// Advance virtual time by `ms` milliseconds of hardware ticks.
    pub fn advance_ms(&mut self, ms: u64) {
        let target_ns = self.elapsed_ns + ms * 1_000_000;
        let due = target_ns / TICK_NS;
        let pending = due.saturating_sub(self.ticked);
        self.ticks(pending);
        self.elapsed_ns = target_ns;
    }

    /// Completed console lines so far.
    pub fn console_lines(&self) -> usize {
        self.console.line_count()
    }
}
