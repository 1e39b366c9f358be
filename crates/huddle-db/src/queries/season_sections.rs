//! Database query functions for season sections and their contributed
//! defaults and links.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{SeasonSection, SectionDefault, SectionLink};

/// List a season's sections in display order.
pub async fn list_sections_for_season(
    pool: &PgPool,
    season_id: Uuid,
) -> Result<Vec<SeasonSection>> {
    let sections = sqlx::query_as::<_, SeasonSection>(
        "SELECT * FROM season_sections WHERE season_id = $1 ORDER BY display_order, created_at",
    )
    .bind(season_id)
    .fetch_all(pool)
    .await
    .context("failed to list season sections")?;

    Ok(sections)
}

/// List the default plan sections contributed by one season section.
pub async fn list_defaults_for_section(
    pool: &PgPool,
    section_id: Uuid,
) -> Result<Vec<SectionDefault>> {
    let defaults = sqlx::query_as::<_, SectionDefault>(
        "SELECT * FROM section_defaults \
         WHERE season_section_id = $1 \
         ORDER BY section_order NULLS LAST, section_name",
    )
    .bind(section_id)
    .fetch_all(pool)
    .await
    .context("failed to list section defaults")?;

    Ok(defaults)
}

/// List the drills and formations pre-linked to one season section.
pub async fn list_links_for_section(pool: &PgPool, section_id: Uuid) -> Result<Vec<SectionLink>> {
    let links = sqlx::query_as::<_, SectionLink>(
        "SELECT * FROM section_links \
         WHERE season_section_id = $1 \
         ORDER BY order_in_section",
    )
    .bind(section_id)
    .fetch_all(pool)
    .await
    .context("failed to list section links")?;

    Ok(links)
}
