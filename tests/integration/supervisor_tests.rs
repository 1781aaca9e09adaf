//! End-to-end supervisor scenarios: liveness presses, debounce gating,
//! missed-window accounting, and the terminal lockdown path.

use deadman::config::SupervisorConfig;
use deadman::hal::{DigitalPin, EdgeIrqCtl, WatchdogPeriod};

use crate::sim_rig::Rig;

/// 8192 ms watchdog window in 0.128 ms hardware ticks.
const WINDOW_TICKS: u64 = 64_000;

/// 50 ms blink interval in hardware ticks (round-half-up).
const BLINK_TICKS: u64 = 391;

#[test]
fn press_pulses_watchdog_and_opens_debounce_window() {
    let mut rig = Rig::new();

    rig.press();

    assert_eq!(rig.watchdog.reset_pulses(), 1);
    assert!(rig.console.contains("Watchdog timer reset!"));
    assert!(rig.supervisor.debounce_suppressing());
    assert!(!rig.port.edge_interrupts_enabled());
}

#[test]
fn release_edge_is_not_a_liveness_signal() {
    let mut rig = Rig::new();

    rig.press();
    rig.advance_ms(301);
    let lines = rig.console_lines();

    rig.release();

    assert_eq!(rig.watchdog.reset_pulses(), 1);
    assert_eq!(rig.console_lines(), lines);
}

#[test]
fn bounce_inside_window_is_swallowed() {
    let mut rig = Rig::new();

    rig.press();
    rig.release();
    rig.press();

    assert_eq!(rig.watchdog.reset_pulses(), 1);
}

#[test]
fn window_reopens_after_debounce_expiry() {
    let mut rig = Rig::new();

    rig.press();
    rig.advance_ms(299);
    assert!(rig.supervisor.debounce_suppressing());

    rig.advance_ms(2);
    assert!(!rig.supervisor.debounce_suppressing());
    assert!(rig.port.edge_interrupts_enabled());

    // The release edge re-arms the window (either polarity masks the
    // group), so the next press only lands after a second expiry.
    rig.release();
    rig.advance_ms(301);
    rig.press();
    assert_eq!(rig.watchdog.reset_pulses(), 2);
}

#[test]
fn periodic_presses_keep_the_watchdog_quiet() {
    let mut rig = Rig::new();

    for _ in 0..6 {
        rig.advance_ms(5_000);
        rig.press();
        rig.advance_ms(400);
        rig.release();
    }

    assert_eq!(rig.supervisor.timeout_count(), 0);
    assert!(!rig.supervisor.is_locked_down());
    assert_eq!(rig.watchdog.reset_pulses(), 6);
}

#[test]
fn each_missed_window_is_counted_and_persisted() {
    let mut rig = Rig::new();

    rig.ticks(WINDOW_TICKS);
    assert_eq!(rig.supervisor.timeout_count(), 1);
    assert!(rig.console.contains("Number of timeouts: 1"));

    rig.ticks(WINDOW_TICKS);
    assert_eq!(rig.supervisor.timeout_count(), 2);
    assert!(rig.console.contains("Number of timeouts: 2"));
    assert_eq!(rig.supervisor.persisted_timeout_count(), 2);
    assert!(!rig.supervisor.is_locked_down());
}

#[test]
fn fifth_missed_window_locks_down() {
    let mut rig = Rig::new();

    rig.ticks(4 * WINDOW_TICKS);
    assert_eq!(rig.supervisor.timeout_count(), 4);
    assert!(!rig.supervisor.is_locked_down());

    rig.ticks(WINDOW_TICKS);

    assert!(rig.supervisor.is_locked_down());
    assert!(rig.lockdown.engaged());
    assert_eq!(rig.supervisor.timeout_count(), 5);
    assert!(rig.console.contains("Maximum number of timeouts has elapsed!"));
    assert!(rig.console.contains("System lockdown!"));

    // The terminal count is never written back; the store holds the
    // last below-threshold value.
    assert_eq!(rig.supervisor.persisted_timeout_count(), 4);

    // Liveness input is torn down, fault blink is armed, and the
    // watchdog keeps interrupting.
    assert!(!rig.port.edge_interrupts_enabled());
    assert!(rig.supervisor.blink_armed());
    assert!(rig.watchdog.interrupt_mode());
}

#[test]
fn lockdown_blinks_the_fault_indicator() {
    let mut rig = Rig::new();

    rig.ticks(5 * WINDOW_TICKS);
    assert!(rig.supervisor.is_locked_down());
    assert!(!rig.fault_pin.read_level());

    rig.ticks(BLINK_TICKS);
    assert!(rig.fault_pin.read_level());

    rig.ticks(BLINK_TICKS);
    assert!(!rig.fault_pin.read_level());
}

#[test]
fn lockdown_is_terminal() {
    let mut rig = Rig::new();

    rig.ticks(5 * WINDOW_TICKS);
    assert!(rig.supervisor.is_locked_down());
    let lines = rig.console_lines();
    let pulses = rig.watchdog.reset_pulses();

    // Presses no longer reach the supervisor; later watchdog expiries
    // neither count nor log.
    rig.press();
    rig.ticks(WINDOW_TICKS);

    assert_eq!(rig.watchdog.reset_pulses(), pulses);
    assert_eq!(rig.supervisor.timeout_count(), 5);
    assert_eq!(rig.console_lines(), lines);
    assert_eq!(rig.supervisor.persisted_timeout_count(), 4);
}

#[test]
fn threshold_and_window_follow_the_config() {
    let mut rig = Rig::with_config(SupervisorConfig {
        watchdog_period: WatchdogPeriod::Ms1024,
        timeout_max: 2,
        ..SupervisorConfig::default()
    });
    // 1024 ms window in hardware ticks.
    let window = 1_024 * 1_000 / 128;

    rig.ticks(window);
    assert_eq!(rig.supervisor.timeout_count(), 1);
    assert!(!rig.supervisor.is_locked_down());

    rig.ticks(window);
    assert!(rig.supervisor.is_locked_down());
    assert_eq!(rig.supervisor.persisted_timeout_count(), 1);
}
