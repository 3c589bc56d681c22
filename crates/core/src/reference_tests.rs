// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[parameterized(
    first = { 1, "ISS-20260301-0001" },
    two_digits = { 42, "ISS-20260301-0042" },
    max_padded = { 9999, "ISS-20260301-9999" },
    overflow = { 10000, "ISS-20260301-10000" },
)]
fn format_pads_to_four_digits(sequence: u64, expected: &str) {
    assert_eq!(format_reference_code(day(2026, 3, 1), sequence), expected);
}

#[parameterized(
    canonical = { "ISS-20260301-0001", true },
    long_sequence = { "ISS-20260301-12345", true },
    short_sequence = { "ISS-20260301-001", false },
    wrong_prefix = { "RFI-20260301-0001", false },
    bad_date = { "ISS-20261301-0001", false },
    short_date = { "ISS-2026031-0001", false },
    letters = { "ISS-2026030a-0001", false },
    missing_sequence = { "ISS-20260301", false },
    lowercase = { "iss-20260301-0001", false },
)]
fn validity(code: &str, expected: bool) {
    assert_eq!(is_valid_reference_code(code), expected);
}

#[test]
fn parse_returns_parts() {
    let (d, seq) = parse_reference_code("ISS-20261014-0007").unwrap();
    assert_eq!(d, day(2026, 10, 14));
    assert_eq!(seq, 7);
}

#[test]
fn day_bounds_cover_utc_day() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 23, 59, 59).unwrap();
    let (start, end) = utc_day_bounds(now);
    assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
    assert!(start <= now && now < end);
}

#[test]
fn day_prefix_matches_formatted_codes() {
    let prefix = reference_day_prefix(day(2026, 3, 1));
    assert_eq!(prefix, "ISS-20260301-");
    assert!(format_reference_code(day(2026, 3, 1), 12).starts_with(&prefix));
}

#[parameterized(
    empty_day = { 0, 0, 1, 1 },
    count_leads = { 3, 3, 1, 4 },
    gap_after_purge = { 1, 2, 1, 3 },
    retry_moves_on = { 1, 2, 3, 5 },
)]
fn next_sequence_skips_issued_codes(count: u64, highest: u64, attempt: u32, expected: u64) {
    assert_eq!(next_sequence(count, highest, attempt), expected);
}
