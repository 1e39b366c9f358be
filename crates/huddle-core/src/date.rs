//! Local-calendar-date primitives.
//!
//! All date values inside the engine are `chrono::NaiveDate` -- a plain
//! calendar date with no timezone attached, so a practice scheduled for
//! 2024-03-01 stays on 2024-03-01 regardless of the server's UTC offset.
//! String conversion happens only at external boundaries (CLI arguments,
//! serialized skip reasons), and only through these two functions.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::EngineError;

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_local_date(value: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        EngineError::Validation(format!("invalid date {value:?}, expected YYYY-MM-DD"))
    })
}

/// Format a calendar date as `YYYY-MM-DD`. Inverse of [`parse_local_date`].
pub fn format_local_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Weekday index with Sunday = 0 .. Saturday = 6, matching the
/// `day_of_week` encoding on recurrence patterns.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Human-readable weekday name for preview rows.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
