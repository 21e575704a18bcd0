//! System cell tests: value clamping, decay, atomic drains, and
//! degradation-rate bookkeeping.

use reactor_core::config::{MAX_SYSTEM_VALUE, MIN_SYSTEM_VALUE};
use reactor_core::system::SystemCell;

fn cell(value: i32, rate: i32) -> SystemCell {
    SystemCell::new(0, "Coolant Flow", value, rate)
}

/// No mutation may push a value outside [0, 100].
#[test]
fn value_is_clamped_on_every_mutation() {
    let c = cell(90, 3);

    c.harm(1_000);
    assert_eq!(c.value(), MIN_SYSTEM_VALUE);

    c.boost(1_000);
    assert_eq!(c.value(), MAX_SYSTEM_VALUE);

    c.set_value(-50);
    assert_eq!(c.value(), MIN_SYSTEM_VALUE);

    c.set_value(250);
    assert_eq!(c.value(), MAX_SYSTEM_VALUE);
}

#[test]
fn degrade_subtracts_the_rate() {
    let c = cell(90, 3);
    c.degrade();
    assert_eq!(c.value(), 87);
    c.degrade();
    assert_eq!(c.value(), 84);
}

#[test]
fn degrade_stops_at_zero() {
    let c = cell(2, 5);
    c.degrade();
    assert_eq!(c.value(), 0);
    c.degrade();
    assert_eq!(c.value(), 0);
}

/// Frozen systems do not decay but still take event damage.
#[test]
fn frozen_skips_decay_but_not_damage() {
    let c = cell(50, 4);
    c.set_frozen(true);

    c.degrade();
    assert_eq!(c.value(), 50);

    c.harm(7);
    assert_eq!(c.value(), 43);

    c.set_frozen(false);
    c.degrade();
    assert_eq!(c.value(), 39);
}

/// The drain only succeeds when the reserve would survive it, and a
/// failed drain changes nothing.
#[test]
fn try_drain_respects_the_reserve() {
    let c = cell(50, 3);
    assert!(c.try_drain(20, 10));
    assert_eq!(c.value(), 30);

    // 30 < 25 + 10: refused, untouched.
    assert!(!c.try_drain(25, 10));
    assert_eq!(c.value(), 30);

    // Exactly at the boundary: 30 >= 20 + 10.
    assert!(c.try_drain(20, 10));
    assert_eq!(c.value(), 10);
}

#[test]
fn raise_rate_returns_the_previous_rate() {
    let c = cell(80, 3);
    assert_eq!(c.raise_rate(2), 3);
    assert_eq!(c.read().degradation_rate, 5);
    assert_eq!(c.raise_rate(2), 5);
    assert_eq!(c.read().degradation_rate, 7);
}

/// Overlapping glitch restores are last-writer-wins: replaying both
/// captured rates in completion order lands on the second capture,
/// not the original.
#[test]
fn overlapping_rate_restores_are_last_writer_wins() {
    let c = cell(80, 3);
    let first_capture = c.raise_rate(2); // 3
    let second_capture = c.raise_rate(2); // 5

    c.set_rate(first_capture);
    c.set_rate(second_capture);
    assert_eq!(c.read().degradation_rate, 5);
}
