//! Instantiation of one practice plan for one date.
//!
//! Invoked per date by the batch orchestrator. The existing-practice check
//! is repeated here even though the previewer already classified the date:
//! time passes between preview and execute, and this check runs immediately
//! before the write.

use chrono::NaiveDate;
use uuid::Uuid;

use huddle_db::models::SeasonSection;

use crate::date::format_local_date;
use crate::draft::{build_union_draft, DraftOptions};
use crate::error::EngineError;
use crate::store::{
    CreatedPlan, PracticePlanStore, SeasonSectionStore, SeasonStore, Stores,
};

/// Create one practice plan for `date` from the season's template and the
/// sections overlapping that date.
pub async fn instantiate_for_date(
    stores: &Stores,
    season_id: Uuid,
    date: NaiveDate,
    user_id: Uuid,
    team_id: Uuid,
    options: &DraftOptions,
) -> Result<CreatedPlan, EngineError> {
    let season = stores
        .seasons
        .get(season_id)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("season {season_id}")))?;

    if date < season.start_date || date > season.end_date {
        return Err(EngineError::Validation(format!(
            "date {} is outside season bounds {}..{}",
            format_local_date(date),
            format_local_date(season.start_date),
            format_local_date(season.end_date),
        )));
    }

    if let Some(existing) = stores.plans.get_by_team_and_date(team_id, date).await? {
        return Err(EngineError::Validation(format!(
            "practice {:?} already exists on {}",
            existing.name,
            format_local_date(date),
        )));
    }

    let overlapping = overlapping_sections(
        &stores.sections.list_sections(season_id).await?,
        date,
    );

    let draft = build_union_draft(stores, &season, &overlapping, date, team_id, options).await?;

    let created = stores.plans.create_with_content(&draft, user_id).await?;

    tracing::info!(
        plan_id = %created.id,
        team_id = %team_id,
        date = %format_local_date(date),
        sections = draft.sections.len(),
        drills = draft.drills.len(),
        "practice plan created"
    );

    Ok(created)
}

/// Sections whose inclusive `[start_date, end_date]` range contains `date`,
/// in the order given (season display order).
pub fn overlapping_sections(sections: &[SeasonSection], date: NaiveDate) -> Vec<SeasonSection> {
    sections
        .iter()
        .filter(|s| s.start_date <= date && date <= s.end_date)
        .cloned()
        .collect()
}
