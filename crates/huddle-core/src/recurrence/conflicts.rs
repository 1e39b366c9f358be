//! Conflict classification for candidate dates.
//!
//! Pure: takes the candidate dates plus pre-fetched sets of existing
//! practice dates and marker-covered dates, and decides create-or-skip per
//! date. Rule order matters and the first match wins.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use huddle_db::models::SeasonMarker;

/// Skip reason for a date that already has a scheduled practice.
pub const REASON_PRACTICE_EXISTS: &str = "Practice already exists";

/// Skip reason for a date covered by a season marker.
pub const REASON_MARKER: &str = "Marker/event on this date";

/// Create-or-skip decision for one candidate date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateDecision {
    pub will_create: bool,
    pub skip_reason: Option<String>,
}

impl DateDecision {
    fn create() -> Self {
        Self {
            will_create: true,
            skip_reason: None,
        }
    }

    fn skip(reason: &str) -> Self {
        Self {
            will_create: false,
            skip_reason: Some(reason.to_string()),
        }
    }
}

/// Classify each candidate date against existing practices and markers.
///
/// Rules, first match wins:
/// 1. a practice already exists on the date -> skip;
/// 2. the date is covered by a marker -> skip;
/// 3. otherwise -> create.
///
/// Callers that have marker suppression disabled pass an empty marker set.
pub fn classify(
    dates: &[NaiveDate],
    existing: &HashSet<NaiveDate>,
    marker_dates: &HashSet<NaiveDate>,
) -> BTreeMap<NaiveDate, DateDecision> {
    let mut decisions = BTreeMap::new();
    for &date in dates {
        let decision = if existing.contains(&date) {
            DateDecision::skip(REASON_PRACTICE_EXISTS)
        } else if marker_dates.contains(&date) {
            DateDecision::skip(REASON_MARKER)
        } else {
            DateDecision::create()
        };
        decisions.insert(date, decision);
    }
    decisions
}

/// Expand marker `[start, end]` ranges into the set of every covered day.
pub fn expand_marker_dates(markers: &[SeasonMarker]) -> HashSet<NaiveDate> {
    let mut days = HashSet::new();
    for marker in markers {
        let mut day = marker.start_date;
        while day <= marker.end_date {
            days.insert(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }
    days
}
