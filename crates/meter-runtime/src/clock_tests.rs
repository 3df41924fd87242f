//! Tests for clock and timestamp types.

use super::*;

#[test]
fn test_duration_since() {
    let start: Timestamp = "2025-01-01T00:00:00Z".parse().unwrap();
    let end: Timestamp = "2025-01-01T00:00:03Z".parse().unwrap();

    assert_eq!(end.duration_since(&start), Duration::from_secs(3));
}

#[test]
fn test_duration_since_clamps_at_zero() {
    let start: Timestamp = "2025-01-01T00:00:10Z".parse().unwrap();
    let end: Timestamp = "2025-01-01T00:00:00Z".parse().unwrap();

    assert_eq!(end.duration_since(&start), Duration::ZERO);
}

#[test]
fn test_timestamp_display() {
    let ts: Timestamp = "2025-01-01T12:30:45Z".parse().unwrap();
    assert_eq!(ts.to_string(), "2025-01-01 12:30:45 UTC");
}

#[test]
fn test_system_clock_tracks_wall_clock() {
    let clock = SystemClock::new();
    let reading = clock.now();

    let drift = Timestamp::now().duration_since(&reading);
    assert!(drift < Duration::from_secs(5));
}

#[test]
fn test_manual_clock_advance() {
    let clock = ManualClock::new("2025-01-01T00:00:00Z".parse().unwrap());
    let start = clock.now();

    clock.advance(chrono::Duration::seconds(42));

    assert_eq!(clock.now().duration_since(&start), Duration::from_secs(42));
}

#[test]
fn test_manual_clock_advance_backwards() {
    let clock = ManualClock::new("2025-01-01T00:01:00Z".parse().unwrap());
    let start = clock.now();

    clock.advance(chrono::Duration::seconds(-30));

    // Reading moved into the past; elapsed measurement clamps at zero
    assert_eq!(clock.now().duration_since(&start), Duration::ZERO);
    assert_eq!(start.duration_since(&clock.now()), Duration::from_secs(30));
}

#[test]
fn test_manual_clock_set() {
    let clock = ManualClock::starting_now();
    let target: Timestamp = "2030-06-15T08:00:00Z".parse().unwrap();

    clock.set(target.clone());

    assert_eq!(clock.now(), target);
}
