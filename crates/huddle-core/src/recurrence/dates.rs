//! Candidate date generation from a recurrence pattern.
//!
//! Walks the query window day by day and keeps dates the pattern variant
//! matches, then removes explicit skip dates. Each variant is a pure
//! function; dispatch over [`PatternKind`] is exhaustive.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use huddle_db::models::{PatternKind, RecurrencePattern};

use crate::date::weekday_index;
use crate::error::EngineError;

/// Generate the ascending, deduplicated list of dates in `[start, end]`
/// (inclusive) matched by the pattern, minus its skip dates.
///
/// An empty day set and a reversed range both yield an empty result rather
/// than an error. Runs in O(days in range).
pub fn generate_dates(
    pattern: &RecurrencePattern,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }

    let mut dates = Vec::new();
    let mut day = start;
    loop {
        let keep = match pattern.pattern {
            PatternKind::Weekly => matches_weekly(&pattern.day_of_week, day),
            PatternKind::Biweekly => matches_biweekly(&pattern.day_of_week, start, day),
            PatternKind::Monthly => matches_monthly(&pattern.day_of_month, day),
            // Extension point: custom rules are stored but expand to nothing.
            PatternKind::Custom => false,
        };
        if keep {
            dates.push(day);
        }
        if day >= end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let skips: HashSet<NaiveDate> = pattern.skip_dates.iter().copied().collect();
    dates.retain(|d| !skips.contains(d));
    dates
}

/// Weekly: keep a day when its weekday is selected.
fn matches_weekly(day_of_week: &[i16], day: NaiveDate) -> bool {
    day_of_week.contains(&weekday_index(day))
}

/// Biweekly: weekly, restricted to even-numbered weeks counted from the
/// query window's start. The phase is anchored to the window, not to the
/// recurrence's creation date, so the same recurrence previewed over two
/// different windows can land on different weeks.
fn matches_biweekly(day_of_week: &[i16], window_start: NaiveDate, day: NaiveDate) -> bool {
    if !matches_weekly(day_of_week, day) {
        return false;
    }
    let week = (day - window_start).num_days() / 7;
    week % 2 == 0
}

/// Monthly: keep a day when its day-of-month is selected.
fn matches_monthly(day_of_month: &[i16], day: NaiveDate) -> bool {
    day_of_month.contains(&(day.day() as i16))
}

/// Basic presence validation for pattern fields, applied when a recurrence
/// is created: weekly and biweekly need at least one weekday, monthly at
/// least one day of month.
pub fn validate_pattern_fields(
    pattern: PatternKind,
    day_of_week: &[i16],
    day_of_month: &[i16],
) -> Result<(), EngineError> {
    match pattern {
        PatternKind::Weekly | PatternKind::Biweekly => {
            if day_of_week.is_empty() {
                return Err(EngineError::Validation(format!(
                    "{pattern} pattern requires at least one day of week"
                )));
            }
            if let Some(bad) = day_of_week.iter().find(|d| !(0..=6).contains(*d)) {
                return Err(EngineError::Validation(format!(
                    "day of week {bad} out of range 0..=6"
                )));
            }
        }
        PatternKind::Monthly => {
            if day_of_month.is_empty() {
                return Err(EngineError::Validation(
                    "monthly pattern requires at least one day of month".to_string(),
                ));
            }
            if let Some(bad) = day_of_month.iter().find(|d| !(1..=31).contains(*d)) {
                return Err(EngineError::Validation(format!(
                    "day of month {bad} out of range 1..=31"
                )));
            }
        }
        PatternKind::Custom => {}
    }
    Ok(())
}
