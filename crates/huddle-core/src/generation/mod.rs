//! Batch generation: drives the previewer across a date range and
//! instantiates a plan for every creatable date, with per-date failure
//! isolation and a final audit log.

pub mod instantiate;

pub use instantiate::{instantiate_for_date, overlapping_sections};

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use huddle_db::models::GenerationLog;
use huddle_db::queries::generation_logs::NewGenerationLog;

use crate::date::format_local_date;
use crate::draft::DraftOptions;
use crate::error::EngineError;
use crate::recurrence::preview::preview_generation;
use crate::store::{CreatedPlan, GenerationLogStore, Stores};

/// Result of one batch-generation run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// The persisted audit log row.
    pub log: GenerationLog,
    pub generated: usize,
    pub skipped: usize,
    pub generated_plan_ids: Vec<Uuid>,
    pub skip_reasons: BTreeMap<NaiveDate, String>,
}

/// Generate practice plans for every creatable date in `[start, end]`.
///
/// Runs the previewer once and follows its per-date plan exactly. Dates are
/// processed sequentially in ascending order; each date's plan commits
/// independently, and a failing date is recorded as `"Error: <message>"`
/// without halting the rest. Partial success is a valid, reported outcome:
/// once the preview succeeds, the run always resolves, even with zero dates
/// generated.
pub async fn batch_generate(
    stores: &Stores,
    recurrence_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    user_id: Uuid,
    team_id: Uuid,
) -> Result<BatchOutcome, EngineError> {
    let preview = preview_generation(stores, recurrence_id, start, end).await?;
    let recurrence = &preview.recurrence;

    tracing::info!(
        recurrence_id = %recurrence_id,
        start = %format_local_date(start),
        end = %format_local_date(end),
        will_create = preview.will_create,
        will_skip = preview.will_skip,
        "starting batch generation"
    );

    let options = DraftOptions {
        start_time: recurrence.time_of_day,
        template_plan_id: recurrence.template_plan_id,
        ..DraftOptions::default()
    };

    // One result per date, collected first, partitioned after.
    let mut results: Vec<(NaiveDate, Result<CreatedPlan, EngineError>)> = Vec::new();
    let mut skip_reasons: BTreeMap<NaiveDate, String> = BTreeMap::new();

    for entry in &preview.entries {
        if !entry.will_create {
            let reason = entry
                .skip_reason
                .clone()
                .unwrap_or_else(|| "Skipped".to_string());
            skip_reasons.insert(entry.date, reason);
            continue;
        }

        let result = instantiate_for_date(
            stores,
            recurrence.season_id,
            entry.date,
            user_id,
            team_id,
            &options,
        )
        .await;
        results.push((entry.date, result));
    }

    let mut generated_plan_ids = Vec::new();
    for (date, result) in results {
        match result {
            Ok(plan) => generated_plan_ids.push(plan.id),
            Err(e) => {
                tracing::warn!(
                    recurrence_id = %recurrence_id,
                    date = %format_local_date(date),
                    error = %e,
                    "date failed, continuing batch"
                );
                skip_reasons.insert(date, format!("Error: {e}"));
            }
        }
    }

    let generated = generated_plan_ids.len();
    let skipped = skip_reasons.len();

    let serialized_reasons: BTreeMap<String, String> = skip_reasons
        .iter()
        .map(|(date, reason)| (format_local_date(*date), reason.clone()))
        .collect();
    let skip_reasons_json = serde_json::to_value(&serialized_reasons)
        .map_err(|e| EngineError::Internal(anyhow::Error::new(e)))?;

    let log = stores
        .logs
        .insert(&NewGenerationLog {
            recurrence_id,
            generated_count: generated as i32,
            skipped_count: skipped as i32,
            start_date: start,
            end_date: end,
            generated_plan_ids: generated_plan_ids.clone(),
            skip_reasons: skip_reasons_json,
            generated_by: user_id,
        })
        .await?;

    tracing::info!(
        recurrence_id = %recurrence_id,
        log_id = %log.id,
        generated = generated,
        skipped = skipped,
        "batch generation finished"
    );

    Ok(BatchOutcome {
        log,
        generated,
        skipped,
        generated_plan_ids,
        skip_reasons,
    })
}
