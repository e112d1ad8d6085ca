//! Calendar helpers. "Now" is always caller-supplied; nothing here reads the
//! system clock.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Timelike};

/// Advance a date by whole months, keeping the day-of-month (clamped to the
/// target month's end, e.g. Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The most recent Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The first of `date`'s month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// Minute of day in [0, 1439].
pub fn minute_of_day(ts: NaiveDateTime) -> u32 {
    ts.hour() * 60 + ts.minute()
}

/// Weekday index with 0 = Sunday, matching the `dow_prob` array layout.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}
