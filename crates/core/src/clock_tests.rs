// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;

#[test]
fn manual_clock_is_frozen_until_advanced() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let clock = ManualClock::new(start);
    assert_eq!(clock.now(), start);
    assert_eq!(clock.now(), start);

    clock.advance(Duration::minutes(90));
    assert_eq!(clock.now(), start + Duration::minutes(90));
}

#[test]
fn manual_clock_set_jumps() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 1).unwrap();
    let clock = ManualClock::new(start);
    clock.set(later);
    assert_eq!(clock.now(), later);
}

#[test]
fn clock_through_reference_and_arc() {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let clock = std::sync::Arc::new(ManualClock::new(start));
    let by_ref = &*clock;
    assert_eq!(Clock::now(&by_ref), start);
    assert_eq!(Clock::now(&clock), start);
}

#[test]
fn system_clock_is_close_to_now() {
    let before = Utc::now();
    let now = SystemClock.now();
    let after = Utc::now();
    assert!(now >= before && now <= after);
}

#[test]
fn format_timestamp_is_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let fractional = whole + Duration::microseconds(1500);
    assert_eq!(format_timestamp(whole), "2026-03-01T08:00:00.000000Z");
    assert_eq!(format_timestamp(fractional), "2026-03-01T08:00:00.001500Z");
    assert!(format_timestamp(whole) < format_timestamp(fractional));
}
