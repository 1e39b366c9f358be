//! Database query functions for the `seasons` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Season;

/// Fetch a season by its ID.
pub async fn get_season(pool: &PgPool, id: Uuid) -> Result<Option<Season>> {
    let season = sqlx::query_as::<_, Season>("SELECT * FROM seasons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch season")?;

    Ok(season)
}
