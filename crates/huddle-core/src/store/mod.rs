//! The store trait seam -- the engine's only route to persistence.
//!
//! Each trait is intentionally object-safe so implementations can be stored
//! as `Arc<dyn ...>` in a [`Stores`] bundle: the Postgres-backed
//! [`postgres::PgStores`] in production, in-memory fakes in tests.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use huddle_db::models::{
    GenerationLog, PlanDrill, PlanSection, PracticePlan, RecurrencePattern, Season, SeasonMarker,
    SeasonSection, SectionDefault, SectionLink,
};
use huddle_db::queries::generation_logs::NewGenerationLog;
use huddle_db::queries::recurrences::NewRecurrence;

use crate::draft::UnionDraft;

/// The sections and drills of a persisted plan, as read back for template
/// seeding.
#[derive(Debug, Clone)]
pub struct PlanContent {
    pub sections: Vec<PlanSection>,
    pub drills: Vec<PlanDrill>,
}

/// Minimal handle to a freshly persisted plan.
#[derive(Debug, Clone)]
pub struct CreatedPlan {
    pub id: Uuid,
    pub name: String,
}

/// Recurrence pattern CRUD.
#[async_trait]
pub trait RecurrenceStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<RecurrencePattern>>;
    async fn create(&self, new: &NewRecurrence) -> Result<RecurrencePattern>;
    async fn set_active(&self, id: Uuid, active: bool) -> Result<()>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn list_by_season(&self, season_id: Uuid) -> Result<Vec<RecurrencePattern>>;
}

/// Practice plan lookups and creation.
#[async_trait]
pub trait PracticePlanStore: Send + Sync {
    async fn get_by_team_and_date(
        &self,
        team_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<PracticePlan>>;

    /// Scheduled dates for a team within an inclusive range.
    async fn list_scheduled_dates(
        &self,
        team_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>>;

    /// Content of a persisted plan, or `None` when the plan does not exist.
    async fn get_content(&self, plan_id: Uuid) -> Result<Option<PlanContent>>;

    /// Persist a union draft as a new plan with its content rows.
    async fn create_with_content(&self, draft: &UnionDraft, user_id: Uuid) -> Result<CreatedPlan>;
}

/// Season lookup.
#[async_trait]
pub trait SeasonStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Season>>;
}

/// Season section lookups: the sections themselves plus the defaults and
/// links each one contributes.
#[async_trait]
pub trait SeasonSectionStore: Send + Sync {
    /// Sections in season display order.
    async fn list_sections(&self, season_id: Uuid) -> Result<Vec<SeasonSection>>;
    async fn list_defaults(&self, section_id: Uuid) -> Result<Vec<SectionDefault>>;
    async fn list_links(&self, section_id: Uuid) -> Result<Vec<SectionLink>>;
}

/// Season calendar marker lookup.
#[async_trait]
pub trait SeasonMarkerStore: Send + Sync {
    async fn list_markers(&self, season_id: Uuid) -> Result<Vec<SeasonMarker>>;
}

/// Generation audit log persistence.
#[async_trait]
pub trait GenerationLogStore: Send + Sync {
    async fn insert(&self, new: &NewGenerationLog) -> Result<GenerationLog>;
    async fn list_by_recurrence(&self, recurrence_id: Uuid) -> Result<Vec<GenerationLog>>;
}

// Compile-time assertion: the traits must stay object-safe.
const _: () = {
    fn _assert_object_safe(
        _: &dyn RecurrenceStore,
        _: &dyn PracticePlanStore,
        _: &dyn SeasonStore,
        _: &dyn SeasonSectionStore,
        _: &dyn SeasonMarkerStore,
        _: &dyn GenerationLogStore,
    ) {
    }
};

/// One `Arc<dyn ...>` per collaborator, handed to every engine entry point.
#[derive(Clone)]
pub struct Stores {
    pub recurrences: Arc<dyn RecurrenceStore>,
    pub plans: Arc<dyn PracticePlanStore>,
    pub seasons: Arc<dyn SeasonStore>,
    pub sections: Arc<dyn SeasonSectionStore>,
    pub markers: Arc<dyn SeasonMarkerStore>,
    pub logs: Arc<dyn GenerationLogStore>,
}
