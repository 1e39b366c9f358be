//! Postgres-backed implementation of the store traits, delegating to the
//! query functions in `huddle-db`.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_db::models::{
    GenerationLog, PracticePlan, RecurrencePattern, Season, SeasonMarker, SeasonSection,
    SectionDefault, SectionLink,
};
use huddle_db::queries::generation_logs::{self, NewGenerationLog};
use huddle_db::queries::practice_plans::{self, NewPlanDrill, NewPlanSection, NewPracticePlan};
use huddle_db::queries::recurrences::{self, NewRecurrence};
use huddle_db::queries::{markers, season_sections, seasons};

use crate::draft::UnionDraft;
use crate::store::{
    CreatedPlan, GenerationLogStore, PlanContent, PracticePlanStore, RecurrenceStore, SeasonMarkerStore,
    SeasonSectionStore, SeasonStore, Stores,
};

/// All store traits, backed by one connection pool.
#[derive(Clone)]
pub struct PgStores {
    pool: PgPool,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bundle this implementation behind every trait in a [`Stores`].
    pub fn into_stores(self) -> Stores {
        let shared = Arc::new(self);
        Stores {
            recurrences: shared.clone(),
            plans: shared.clone(),
            seasons: shared.clone(),
            sections: shared.clone(),
            markers: shared.clone(),
            logs: shared,
        }
    }
}

#[async_trait]
impl RecurrenceStore for PgStores {
    async fn get(&self, id: Uuid) -> Result<Option<RecurrencePattern>> {
        recurrences::get_recurrence(&self.pool, id).await
    }

    async fn create(&self, new: &NewRecurrence) -> Result<RecurrencePattern> {
        recurrences::insert_recurrence(&self.pool, new).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        recurrences::set_recurrence_active(&self.pool, id, active).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        recurrences::delete_recurrence(&self.pool, id).await
    }

    async fn list_by_season(&self, season_id: Uuid) -> Result<Vec<RecurrencePattern>> {
        recurrences::list_recurrences_for_season(&self.pool, season_id).await
    }
}

#[async_trait]
impl PracticePlanStore for PgStores {
    async fn get_by_team_and_date(
        &self,
        team_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<PracticePlan>> {
        practice_plans::get_plan_by_team_and_date(&self.pool, team_id, date).await
    }

    async fn list_scheduled_dates(
        &self,
        team_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        practice_plans::list_plan_dates_in_range(&self.pool, team_id, start, end).await
    }

    async fn get_content(&self, plan_id: Uuid) -> Result<Option<PlanContent>> {
        if practice_plans::get_plan(&self.pool, plan_id).await?.is_none() {
            return Ok(None);
        }
        let (sections, drills) = practice_plans::get_plan_content(&self.pool, plan_id).await?;
        Ok(Some(PlanContent { sections, drills }))
    }

    async fn create_with_content(&self, draft: &UnionDraft, user_id: Uuid) -> Result<CreatedPlan> {
        let new = draft_to_new_plan(draft, user_id);
        let plan = practice_plans::insert_plan_with_content(&self.pool, &new).await?;
        Ok(CreatedPlan {
            id: plan.id,
            name: plan.name,
        })
    }
}

#[async_trait]
impl SeasonStore for PgStores {
    async fn get(&self, id: Uuid) -> Result<Option<Season>> {
        seasons::get_season(&self.pool, id).await
    }
}

#[async_trait]
impl SeasonSectionStore for PgStores {
    async fn list_sections(&self, season_id: Uuid) -> Result<Vec<SeasonSection>> {
        season_sections::list_sections_for_season(&self.pool, season_id).await
    }

    async fn list_defaults(&self, section_id: Uuid) -> Result<Vec<SectionDefault>> {
        season_sections::list_defaults_for_section(&self.pool, section_id).await
    }

    async fn list_links(&self, section_id: Uuid) -> Result<Vec<SectionLink>> {
        season_sections::list_links_for_section(&self.pool, section_id).await
    }
}

#[async_trait]
impl SeasonMarkerStore for PgStores {
    async fn list_markers(&self, season_id: Uuid) -> Result<Vec<SeasonMarker>> {
        markers::list_markers_for_season(&self.pool, season_id).await
    }
}

#[async_trait]
impl GenerationLogStore for PgStores {
    async fn insert(&self, new: &NewGenerationLog) -> Result<GenerationLog> {
        generation_logs::insert_log(&self.pool, new).await
    }

    async fn list_by_recurrence(&self, recurrence_id: Uuid) -> Result<Vec<GenerationLog>> {
        generation_logs::list_logs_for_recurrence(&self.pool, recurrence_id).await
    }
}

/// Map a transient union draft onto the insert payload.
fn draft_to_new_plan(draft: &UnionDraft, user_id: Uuid) -> NewPracticePlan {
    NewPracticePlan {
        team_id: draft.team_id,
        season_id: Some(draft.season_id),
        name: draft.name.clone(),
        description: draft.description.clone(),
        scheduled_date: draft.scheduled_date,
        start_time: draft.start_time,
        created_by: user_id,
        sections: draft
            .sections
            .iter()
            .map(|s| NewPlanSection {
                name: s.name.clone(),
                section_order: s.order,
                goals: s.goals.clone(),
                notes: s.notes.clone(),
            })
            .collect(),
        drills: draft
            .drills
            .iter()
            .map(|d| NewPlanDrill {
                kind: d.kind,
                drill_id: d.drill_id,
                formation_id: d.formation_id,
                name: d.name.clone(),
                duration_minutes: d.duration_minutes,
                section_name: d.section_name.clone(),
                order_in_plan: d.order_in_plan,
                parallel_group_id: d.parallel_group_id.clone(),
                parallel_timeline: d.parallel_timeline.clone(),
                group_timelines: d.group_timelines.clone(),
            })
            .collect(),
    }
}
