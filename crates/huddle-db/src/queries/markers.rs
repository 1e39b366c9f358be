//! Database query functions for the `season_markers` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::SeasonMarker;

/// List a season's calendar markers, earliest first.
pub async fn list_markers_for_season(pool: &PgPool, season_id: Uuid) -> Result<Vec<SeasonMarker>> {
    let markers = sqlx::query_as::<_, SeasonMarker>(
        "SELECT * FROM season_markers WHERE season_id = $1 ORDER BY start_date",
    )
    .bind(season_id)
    .fetch_all(pool)
    .await
    .context("failed to list season markers")?;

    Ok(markers)
}
