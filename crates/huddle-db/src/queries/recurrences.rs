//! Database query functions for the `recurrence_patterns` table.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{PatternKind, RecurrencePattern};

/// Input for inserting a new recurrence pattern.
#[derive(Debug, Clone)]
pub struct NewRecurrence {
    pub season_id: Uuid,
    pub team_id: Uuid,
    pub pattern: PatternKind,
    pub day_of_week: Vec<i16>,
    pub day_of_month: Vec<i16>,
    pub time_of_day: Option<NaiveTime>,
    pub duration_minutes: i32,
    pub template_plan_id: Option<Uuid>,
    pub skip_dates: Vec<NaiveDate>,
    pub skip_markers: bool,
    pub created_by: Uuid,
}

/// Insert a new recurrence row. Returns the inserted pattern with
/// server-generated defaults (id, is_active, created_at).
pub async fn insert_recurrence(pool: &PgPool, new: &NewRecurrence) -> Result<RecurrencePattern> {
    let recurrence = sqlx::query_as::<_, RecurrencePattern>(
        "INSERT INTO recurrence_patterns \
         (season_id, team_id, pattern, day_of_week, day_of_month, time_of_day, \
          duration_minutes, template_plan_id, skip_dates, skip_markers, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING *",
    )
    .bind(new.season_id)
    .bind(new.team_id)
    .bind(new.pattern)
    .bind(&new.day_of_week)
    .bind(&new.day_of_month)
    .bind(new.time_of_day)
    .bind(new.duration_minutes)
    .bind(new.template_plan_id)
    .bind(&new.skip_dates)
    .bind(new.skip_markers)
    .bind(new.created_by)
    .fetch_one(pool)
    .await
    .context("failed to insert recurrence pattern")?;

    Ok(recurrence)
}

/// Fetch a recurrence pattern by its ID.
pub async fn get_recurrence(pool: &PgPool, id: Uuid) -> Result<Option<RecurrencePattern>> {
    let recurrence =
        sqlx::query_as::<_, RecurrencePattern>("SELECT * FROM recurrence_patterns WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch recurrence pattern")?;

    Ok(recurrence)
}

/// List all recurrence patterns for a season, oldest first.
pub async fn list_recurrences_for_season(
    pool: &PgPool,
    season_id: Uuid,
) -> Result<Vec<RecurrencePattern>> {
    let recurrences = sqlx::query_as::<_, RecurrencePattern>(
        "SELECT * FROM recurrence_patterns WHERE season_id = $1 ORDER BY created_at",
    )
    .bind(season_id)
    .fetch_all(pool)
    .await
    .context("failed to list recurrence patterns")?;

    Ok(recurrences)
}

/// Flip the `is_active` flag on a recurrence pattern.
pub async fn set_recurrence_active(pool: &PgPool, id: Uuid, active: bool) -> Result<()> {
    let result = sqlx::query("UPDATE recurrence_patterns SET is_active = $1 WHERE id = $2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update recurrence pattern")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("recurrence pattern {id} not found");
    }

    Ok(())
}

/// Delete a recurrence pattern. Generation logs cascade with it.
pub async fn delete_recurrence(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM recurrence_patterns WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete recurrence pattern")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("recurrence pattern {id} not found");
    }

    Ok(())
}
