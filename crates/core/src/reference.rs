// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable issue reference codes.
//!
//! Codes have the form `ISS-{yyyyMMdd}-{NNNN}`: the UTC creation date and a
//! per-project, per-day sequence starting at 1. The sequence is padded to
//! at least four digits and grows past 9999 without truncation.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Fixed prefix of every code.
pub const REFERENCE_PREFIX: &str = "ISS";

/// How many sequences issue creation tries before giving up.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// The `ISS-{yyyyMMdd}-` part shared by every code issued on `day`.
pub fn reference_day_prefix(day: NaiveDate) -> String {
    format!("{REFERENCE_PREFIX}-{}-", day.format("%Y%m%d"))
}

/// Formats a reference code for the given UTC day and sequence number.
pub fn format_reference_code(day: NaiveDate, sequence: u64) -> String {
    format!("{}{sequence:04}", reference_day_prefix(day))
}

/// Sequence to try on the 1-based `attempt`.
///
/// Starts one past the larger of the day's issue count and the highest
/// sequence already issued that day, so purged rows never make a code
/// repeat. Each retry moves one further.
pub fn next_sequence(count: u64, highest: u64, attempt: u32) -> u64 {
    count.max(highest) + u64::from(attempt)
}

/// Half-open `[start, end)` range covering the UTC day containing `now`.
pub fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now);
    (start, start + Duration::days(1))
}

/// Returns true if `code` has the canonical shape `ISS-` + 8 digits + `-` +
/// at least 4 digits, and the date part is a real calendar date.
pub fn is_valid_reference_code(code: &str) -> bool {
    parse_reference_code(code).is_some()
}

/// Splits a code into its date and sequence parts.
pub fn parse_reference_code(code: &str) -> Option<(NaiveDate, u64)> {
    let rest = code.strip_prefix(REFERENCE_PREFIX)?.strip_prefix('-')?;
    let (date, seq) = rest.split_once('-')?;
    if date.len() != 8 || seq.len() < 4 {
        return None;
    }
    if !date.bytes().all(|b| b.is_ascii_digit()) || !seq.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    let sequence = seq.parse().ok()?;
    Some((day, sequence))
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
