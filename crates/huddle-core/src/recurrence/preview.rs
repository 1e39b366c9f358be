//! Generation preview: the authoritative per-date plan for a recurrence
//! over a window.
//!
//! The previewer is the single source of truth for what a generation run
//! would do. Batch execution reuses its output rather than recomputing, so
//! preview and execute can never disagree on the same inputs.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use huddle_db::models::RecurrencePattern;

use crate::date::weekday_label;
use crate::error::EngineError;
use crate::recurrence::conflicts::{classify, expand_marker_dates};
use crate::recurrence::dates::generate_dates;
use crate::store::{PracticePlanStore, RecurrenceStore, SeasonMarkerStore, Stores};

/// One row of the per-date plan.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewEntry {
    pub date: NaiveDate,
    pub weekday_label: &'static str,
    pub will_create: bool,
    pub skip_reason: Option<String>,
}

/// The full preview for a recurrence over a window.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPreview {
    pub recurrence: RecurrencePattern,
    pub total_dates: usize,
    pub will_create: usize,
    pub will_skip: usize,
    /// Per-date rows in ascending date order.
    pub entries: Vec<PreviewEntry>,
}

/// Compute the per-date generation plan for `[start, end]`.
///
/// Fails with `NotFound` when the recurrence does not exist; performs no
/// writes.
pub async fn preview_generation(
    stores: &Stores,
    recurrence_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<GenerationPreview, EngineError> {
    let recurrence = stores
        .recurrences
        .get(recurrence_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("recurrence {recurrence_id}")))?;

    let candidates = generate_dates(&recurrence, start, end);

    let existing: HashSet<NaiveDate> = stores
        .plans
        .list_scheduled_dates(recurrence.team_id, start, end)
        .await?
        .into_iter()
        .collect();

    let marker_dates = if recurrence.skip_markers {
        let markers = stores.markers.list_markers(recurrence.season_id).await?;
        expand_marker_dates(&markers)
    } else {
        HashSet::new()
    };

    let decisions = classify(&candidates, &existing, &marker_dates);

    let entries: Vec<PreviewEntry> = candidates
        .iter()
        .map(|&date| {
            let decision = &decisions[&date];
            PreviewEntry {
                date,
                weekday_label: weekday_label(date),
                will_create: decision.will_create,
                skip_reason: decision.skip_reason.clone(),
            }
        })
        .collect();

    let will_create = entries.iter().filter(|e| e.will_create).count();
    let will_skip = entries.len() - will_create;

    Ok(GenerationPreview {
        recurrence,
        total_dates: entries.len(),
        will_create,
        will_skip,
        entries,
    })
}
