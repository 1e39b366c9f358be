//! Database query functions for the `generation_logs` table.
//!
//! Logs are insert-only: one row per batch-generation run, never updated.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::GenerationLog;

/// Input for inserting a generation log row.
#[derive(Debug, Clone)]
pub struct NewGenerationLog {
    pub recurrence_id: Uuid,
    pub generated_count: i32,
    pub skipped_count: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub generated_plan_ids: Vec<Uuid>,
    pub skip_reasons: serde_json::Value,
    pub generated_by: Uuid,
}

/// Insert a generation log row. Returns the persisted log.
pub async fn insert_log(pool: &PgPool, new: &NewGenerationLog) -> Result<GenerationLog> {
    let log = sqlx::query_as::<_, GenerationLog>(
        "INSERT INTO generation_logs \
         (recurrence_id, generated_count, skipped_count, start_date, end_date, \
          generated_plan_ids, skip_reasons, generated_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING *",
    )
    .bind(new.recurrence_id)
    .bind(new.generated_count)
    .bind(new.skipped_count)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(&new.generated_plan_ids)
    .bind(&new.skip_reasons)
    .bind(new.generated_by)
    .fetch_one(pool)
    .await
    .context("failed to insert generation log")?;

    Ok(log)
}

/// List generation logs for a recurrence, newest first.
pub async fn list_logs_for_recurrence(
    pool: &PgPool,
    recurrence_id: Uuid,
) -> Result<Vec<GenerationLog>> {
    let logs = sqlx::query_as::<_, GenerationLog>(
        "SELECT * FROM generation_logs WHERE recurrence_id = $1 ORDER BY created_at DESC",
    )
    .bind(recurrence_id)
    .fetch_all(pool)
    .await
    .context("failed to list generation logs")?;

    Ok(logs)
}
