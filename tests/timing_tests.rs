//! Integration tests for the rollover clock and software timers

mod common;
use common::*;

use tilt_charades::{ClockConfig, SoftwareTimer, TimeBase};

const ROUND_CYCLES: u64 = 2_880_000_000;

#[test]
fn round_timer_expires_after_exact_cycle_count() {
    let clock = new_clock(ClockConfig::DEFAULT);
    let mut timer = SoftwareTimer::new(60_000, &ClockConfig::DEFAULT);
    assert_eq!(timer.wait_cycles(), ROUND_CYCLES);

    timer.start(&clock);

    advance_clock(&clock, ROUND_CYCLES - 1);
    assert!(!timer.expired(&clock));
    assert_eq!(timer.remaining_secs(&clock), 1);

    advance_clock(&clock, 1);
    assert!(timer.expired(&clock));
    assert_eq!(timer.remaining_secs(&clock), 0);
}

#[test]
fn round_timer_spans_counter_rollover() {
    let clock = new_clock(ClockConfig::DEFAULT);
    clock.counter().set(1_000_000_000);

    let mut timer = SoftwareTimer::new(60_000, &ClockConfig::DEFAULT);
    timer.start(&clock);

    advance_clock(&clock, ROUND_CYCLES - 1);
    assert_eq!(clock.rollovers(), 1);
    assert!(!timer.expired(&clock));

    advance_clock(&clock, 1);
    assert_eq!(clock.current_counter_value(), 2_414_967_296);
    assert!(timer.expired(&clock));
}

#[test]
fn elapsed_time_is_monotonic_across_rollovers() {
    // 1 ms wrap period so a short walk crosses many rollovers
    let config = ClockConfig::DEFAULT.with_counter_max(47_999);
    let clock = new_clock(config);

    let mut timer = SoftwareTimer::new(1_000, &config);
    timer.start(&clock);

    let mut last = 0;
    for step in [1, 7_000, 47_999, 48_000, 13, 100_000, 5] {
        advance_clock(&clock, step);
        let elapsed = timer.elapsed_cycles(&clock);
        assert!(elapsed >= last);
        last = elapsed;
    }

    assert_eq!(last, 1 + 7_000 + 47_999 + 48_000 + 13 + 100_000 + 5);
    assert_eq!(clock.counter().interrupts_cleared() as u64, clock.rollovers());
}

#[test]
fn unstarted_timer_measures_from_process_start() {
    let clock = new_clock(ClockConfig::DEFAULT);
    let timer = SoftwareTimer::new(1, &ClockConfig::DEFAULT);

    advance_clock(&clock, 47_999);
    assert!(!timer.expired(&clock));

    advance_clock(&clock, 1);
    assert!(timer.expired(&clock));
}

#[test]
fn pending_wrap_counts_before_interrupt_runs() {
    let clock = new_clock(ClockConfig::DEFAULT);
    clock.counter().set(100);

    let mut timer = SoftwareTimer::new(1, &ClockConfig::DEFAULT);
    timer.start(&clock);

    advance_masked(clock.counter(), 111);
    assert_eq!(clock.counter().value(), u32::MAX - 10);
    assert_eq!(timer.elapsed_cycles(&clock), 111);

    clock.on_rollover();
    assert!(!clock.counter().is_pending());
    assert_eq!(timer.elapsed_cycles(&clock), 111);
}

#[test]
fn timer_started_during_pending_wrap_does_not_skip_a_period() {
    let clock = new_clock(ClockConfig::DEFAULT);
    clock.counter().set(5);
    advance_masked(clock.counter(), 16);

    let mut timer = SoftwareTimer::new(60_000, &ClockConfig::DEFAULT);
    timer.start(&clock);
    assert_eq!(timer.elapsed_cycles(&clock), 0);

    clock.on_rollover();
    advance_clock(&clock, 990);
    assert_eq!(timer.elapsed_cycles(&clock), 990);
    assert!(!timer.expired(&clock));

    advance_clock(&clock, ROUND_CYCLES - 991);
    assert!(!timer.expired(&clock));
    advance_clock(&clock, 1);
    assert!(timer.expired(&clock));
}

#[test]
fn snapshot_pairs_counter_with_rollovers() {
    let clock = new_clock(ClockConfig::DEFAULT);

    advance_clock(&clock, (1 << 32) + 5);

    let tick = clock.now();
    assert_eq!(tick.rollovers, 1);
    assert_eq!(tick.counter, u32::MAX - 5);
}
