//! Dead-man's switch supervisor, host scenario runner.
//!
//! Wires the supervisor core to the in-memory simulation adapters and
//! replays a full operator session on virtual time:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                     │
//! │                                                               │
//! │  SimPin  SimPort  SimAdc  SimEeprom  SimWatchdog  SimClock    │
//! │                                                               │
//! │  ─────────────────── Port Trait Boundary ──────────────────   │
//! │                                                               │
//! │  ┌───────────────────────────────────────────────────────┐    │
//! │  │           Supervisor (interrupt-vector core)          │    │
//! │  │  LivenessButton · TickTimer · TimeoutCounter          │    │
//! │  └───────────────────────────────────────────────────────┘    │
//! │                                                               │
//! │  SoftPwm (foreground dimming loop, gated by LockdownFlag)     │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The operator presses the liveness button a few times, then walks
//! away. Missed watchdog windows accumulate until the supervisor
//! enters lockdown, after which the fault indicator blinks on its own
//! timer and the run winds down.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::info;

use deadman::adapters::console::SerialConsole;
use deadman::adapters::sim::{
    SimAdc, SimClock, SimEeprom, SimPin, SimPort, SimWatchdog, TICK_NS,
};
use deadman::config::SupervisorConfig;
use deadman::drivers::button::LivenessButton;
use deadman::drivers::indicator::{Indicator, IndicatorBank};
use deadman::drivers::pwm::SoftPwm;
use deadman::events::{drain_vectors, push_vector, InterruptVector};
use deadman::lockdown::LockdownFlag;
use deadman::storage::TimeoutCounter;
use deadman::supervisor::Supervisor;

/// Virtual run length. Long enough for five missed 8192 ms windows
/// plus a couple of seconds of fault blinking.
const RUN_LIMIT_MS: u64 = 60_000;

/// Scripted operator presses (press time, release time), virtual ms.
const PRESS_SCRIPT: &[(u64, u64)] = &[(3_000, 3_040), (9_000, 9_040), (15_500, 15_540)];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = SupervisorConfig::default();
    cfg.validate().context("supervisor configuration")?;

    // Shared-register pins: the first dimmed indicator and the fault
    // indicator wrap the same output line, as on the real board.
    let button_pin = SimPin::new();
    let led_pins = [SimPin::new(), SimPin::new(), SimPin::new()];
    let port = SimPort::new();
    let adc = SimAdc::new(512);
    let eeprom = SimEeprom::new();
    let watchdog = SimWatchdog::new();
    let clock = SimClock::new();
    let lockdown = LockdownFlag::new();

    let button = LivenessButton::new(button_pin.clone(), port.clone());
    let fault_led = Indicator::new(led_pins[0].clone());
    let mut bank = IndicatorBank::new();
    for pin in &led_pins {
        bank.push(Indicator::new(pin.clone()));
    }

    let counter = TimeoutCounter::new_cold_boot(eeprom, cfg.timeout_address);
    let mut pwm = SoftPwm::new(
        adc.clone(),
        bank,
        clock.delay(),
        cfg.pwm_period_us,
        lockdown.clone(),
    );
    let mut supervisor = Supervisor::new(
        &cfg,
        button,
        fault_led,
        watchdog.clone(),
        counter,
        SerialConsole::new(),
        lockdown.clone(),
    );
    supervisor.start();

    // Single-threaded virtual-time loop. The foreground PWM cycle
    // advances the clock; every elapsed 0.128 ms hardware tick is
    // replayed into the timer peripherals, and fired vectors are
    // drained into the supervisor exactly as the interrupt controller
    // would deliver them.
    let mut ticked: u64 = 0;
    let mut script = PRESS_SCRIPT.iter().copied().peekable();
    let mut release_at: Option<u64> = None;

    while clock.elapsed_us() < RUN_LIMIT_MS * 1_000 {
        pwm.run_once();
        if lockdown.engaged() {
            // Disabled PWM no longer burns delay time; idle spin.
            clock.advance_us(TICK_NS / 1_000);
        }

        let now_us = clock.elapsed_us();
        let now_ms = now_us / 1_000;

        if let Some(t) = release_at {
            if now_ms >= t {
                button_pin.release_external();
                release_at = None;
                edge(&port);
            }
        }
        if let Some(&(press, release)) = script.peek() {
            if now_ms >= press {
                script.next();
                // Active-low contact closes.
                button_pin.drive_external(false);
                release_at = Some(release);
                edge(&port);
            }
        }

        let due = now_us * 1_000 / TICK_NS;
        while ticked < due {
            ticked += 1;
            if watchdog.tick() {
                push_vector(InterruptVector::WatchdogTimeout);
            }
            if supervisor.debounce_suppressing() {
                push_vector(InterruptVector::DebounceTick);
            }
            if supervisor.blink_armed() {
                push_vector(InterruptVector::BlinkTick);
            }
        }

        drain_vectors(|vector| supervisor.dispatch(vector));
    }

    info!(
        "scenario complete: locked_down={} timeouts={} persisted={} watchdog_resets={}",
        supervisor.is_locked_down(),
        supervisor.timeout_count(),
        supervisor.persisted_timeout_count(),
        watchdog.reset_pulses(),
    );
    Ok(())
}

/// A level change reaches the supervisor only while the pin-change
/// interrupt group is unmasked; masked edges are dropped, as the
/// debounce window intends.
fn edge(port: &SimPort) {
    use deadman::hal::EdgeIrqCtl;
    if port.edge_interrupts_enabled() {
        push_vector(InterruptVector::PinChange);
    }
}
