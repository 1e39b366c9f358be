//! Shared test utilities for huddle integration tests.
//!
//! Provides [`MemoryStores`], an in-memory implementation of every store
//! trait, plus fixture builders for the row types. Tests exercise the engine
//! end to end without a database; the Postgres implementation is a thin
//! delegation layer exercised in deployment.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use huddle_core::draft::UnionDraft;
use huddle_core::store::{
    CreatedPlan, GenerationLogStore, PlanContent, PracticePlanStore, RecurrenceStore,
    SeasonMarkerStore, SeasonSectionStore, SeasonStore, Stores,
};
use huddle_db::models::{
    GenerationLog, LinkKind, MarkerKind, PatternKind, PlanDrill, PlanSection, PracticePlan,
    RecurrencePattern, Season, SeasonMarker, SeasonSection, SectionDefault, SectionLink,
};
use huddle_db::queries::generation_logs::NewGenerationLog;
use huddle_db::queries::recurrences::NewRecurrence;

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    seasons: Mutex<HashMap<Uuid, Season>>,
    sections: Mutex<Vec<SeasonSection>>,
    defaults: Mutex<Vec<SectionDefault>>,
    links: Mutex<Vec<SectionLink>>,
    markers: Mutex<Vec<SeasonMarker>>,
    recurrences: Mutex<HashMap<Uuid, RecurrencePattern>>,
    plans: Mutex<Vec<PracticePlan>>,
    plan_sections: Mutex<Vec<PlanSection>>,
    plan_drills: Mutex<Vec<PlanDrill>>,
    logs: Mutex<Vec<GenerationLog>>,
    /// Dates on which `create_with_content` fails, for fault-injection tests.
    fail_creation_on: Mutex<HashSet<NaiveDate>>,
}

/// In-memory implementation of every store trait.
///
/// Cheap to clone; clones share state. Mirrors the database's
/// one-practice-per-team-per-date uniqueness constraint.
#[derive(Clone, Default)]
pub struct MemoryStores {
    state: Arc<MemoryState>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this instance behind every trait in a [`Stores`].
    pub fn as_stores(&self) -> Stores {
        let shared = Arc::new(self.clone());
        Stores {
            recurrences: shared.clone(),
            plans: shared.clone(),
            seasons: shared.clone(),
            sections: shared.clone(),
            markers: shared.clone(),
            logs: shared,
        }
    }

    // -- fixture insertion --

    pub fn add_season(&self, season: Season) {
        self.state
            .seasons
            .lock()
            .unwrap()
            .insert(season.id, season);
    }

    pub fn add_recurrence(&self, recurrence: RecurrencePattern) {
        self.state
            .recurrences
            .lock()
            .unwrap()
            .insert(recurrence.id, recurrence);
    }

    pub fn add_section(&self, section: SeasonSection) {
        self.state.sections.lock().unwrap().push(section);
    }

    pub fn add_default(&self, default: SectionDefault) {
        self.state.defaults.lock().unwrap().push(default);
    }

    pub fn add_link(&self, link: SectionLink) {
        self.state.links.lock().unwrap().push(link);
    }

    pub fn add_marker(&self, marker: SeasonMarker) {
        self.state.markers.lock().unwrap().push(marker);
    }

    pub fn add_plan(&self, plan: PracticePlan) {
        self.state.plans.lock().unwrap().push(plan);
    }

    /// Insert a plan together with content rows, for template fixtures.
    pub fn add_plan_with_content(
        &self,
        plan: PracticePlan,
        sections: Vec<PlanSection>,
        drills: Vec<PlanDrill>,
    ) {
        self.state.plan_sections.lock().unwrap().extend(sections);
        self.state.plan_drills.lock().unwrap().extend(drills);
        self.state.plans.lock().unwrap().push(plan);
    }

    /// Make `create_with_content` fail for plans scheduled on `date`.
    pub fn fail_plan_creation_on(&self, date: NaiveDate) {
        self.state.fail_creation_on.lock().unwrap().insert(date);
    }

    // -- assertions --

    pub fn plan_count(&self) -> usize {
        self.state.plans.lock().unwrap().len()
    }

    pub fn plans(&self) -> Vec<PracticePlan> {
        self.state.plans.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<GenerationLog> {
        self.state.logs.lock().unwrap().clone()
    }

    pub fn sections_for_plan(&self, plan_id: Uuid) -> Vec<PlanSection> {
        self.state
            .plan_sections
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.plan_id == plan_id)
            .cloned()
            .collect()
    }

    pub fn drills_for_plan(&self, plan_id: Uuid) -> Vec<PlanDrill> {
        self.state
            .plan_drills
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.plan_id == plan_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecurrenceStore for MemoryStores {
    async fn get(&self, id: Uuid) -> Result<Option<RecurrencePattern>> {
        Ok(self.state.recurrences.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, new: &NewRecurrence) -> Result<RecurrencePattern> {
        let recurrence = RecurrencePattern {
            id: Uuid::new_v4(),
            season_id: new.season_id,
            team_id: new.team_id,
            pattern: new.pattern,
            day_of_week: new.day_of_week.clone(),
            day_of_month: new.day_of_month.clone(),
            time_of_day: new.time_of_day,
            duration_minutes: new.duration_minutes,
            template_plan_id: new.template_plan_id,
            skip_dates: new.skip_dates.clone(),
            skip_markers: new.skip_markers,
            is_active: true,
            created_by: new.created_by,
            created_at: Utc::now(),
        };
        self.add_recurrence(recurrence.clone());
        Ok(recurrence)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let mut recurrences = self.state.recurrences.lock().unwrap();
        match recurrences.get_mut(&id) {
            Some(r) => {
                r.is_active = active;
                Ok(())
            }
            None => bail!("recurrence pattern {id} not found"),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut recurrences = self.state.recurrences.lock().unwrap();
        match recurrences.remove(&id) {
            Some(_) => Ok(()),
            None => bail!("recurrence pattern {id} not found"),
        }
    }

    async fn list_by_season(&self, season_id: Uuid) -> Result<Vec<RecurrencePattern>> {
        let mut list: Vec<RecurrencePattern> = self
            .state
            .recurrences
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.season_id == season_id)
            .cloned()
            .collect();
        list.sort_by_key(|r| r.created_at);
        Ok(list)
    }
}

#[async_trait]
impl PracticePlanStore for MemoryStores {
    async fn get_by_team_and_date(
        &self,
        team_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<PracticePlan>> {
        Ok(self
            .state
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.team_id == team_id && p.scheduled_date == date)
            .cloned())
    }

    async fn list_scheduled_dates(
        &self,
        team_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .state
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.team_id == team_id && p.scheduled_date >= start && p.scheduled_date <= end)
            .map(|p| p.scheduled_date)
            .collect();
        dates.sort_unstable();
        Ok(dates)
    }

    async fn get_content(&self, plan_id: Uuid) -> Result<Option<PlanContent>> {
        let exists = self
            .state
            .plans
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.id == plan_id);
        if !exists {
            return Ok(None);
        }
        let mut sections = self.sections_for_plan(plan_id);
        sections.sort_by_key(|s| s.section_order);
        let mut drills = self.drills_for_plan(plan_id);
        drills.sort_by_key(|d| d.order_in_plan);
        Ok(Some(PlanContent { sections, drills }))
    }

    async fn create_with_content(&self, draft: &UnionDraft, user_id: Uuid) -> Result<CreatedPlan> {
        if self
            .state
            .fail_creation_on
            .lock()
            .unwrap()
            .contains(&draft.scheduled_date)
        {
            bail!("injected storage failure on {}", draft.scheduled_date);
        }

        // Mirror the unique (team_id, scheduled_date) constraint.
        {
            let plans = self.state.plans.lock().unwrap();
            if plans
                .iter()
                .any(|p| p.team_id == draft.team_id && p.scheduled_date == draft.scheduled_date)
            {
                bail!(
                    "duplicate practice plan for team {} on {}",
                    draft.team_id,
                    draft.scheduled_date
                );
            }
        }

        let plan = PracticePlan {
            id: Uuid::new_v4(),
            team_id: draft.team_id,
            season_id: Some(draft.season_id),
            name: draft.name.clone(),
            description: draft.description.clone(),
            scheduled_date: draft.scheduled_date,
            start_time: draft.start_time,
            created_by: user_id,
            created_at: Utc::now(),
        };

        let sections: Vec<PlanSection> = draft
            .sections
            .iter()
            .map(|s| PlanSection {
                id: Uuid::new_v4(),
                plan_id: plan.id,
                name: s.name.clone(),
                section_order: s.order,
                goals: s.goals.clone(),
                notes: s.notes.clone(),
            })
            .collect();

        let section_ids: HashMap<String, Uuid> = sections
            .iter()
            .map(|s| (s.name.to_lowercase(), s.id))
            .collect();

        let drills: Vec<PlanDrill> = draft
            .drills
            .iter()
            .map(|d| PlanDrill {
                id: Uuid::new_v4(),
                plan_id: plan.id,
                kind: d.kind,
                drill_id: d.drill_id,
                formation_id: d.formation_id,
                name: d.name.clone(),
                duration_minutes: d.duration_minutes,
                section_id: d
                    .section_name
                    .as_ref()
                    .and_then(|name| section_ids.get(&name.to_lowercase()))
                    .copied(),
                section_name: d.section_name.clone(),
                order_in_plan: d.order_in_plan,
                parallel_group_id: d.parallel_group_id.clone(),
                parallel_timeline: d.parallel_timeline.clone(),
                group_timelines: d.group_timelines.clone(),
            })
            .collect();

        let created = CreatedPlan {
            id: plan.id,
            name: plan.name.clone(),
        };
        self.add_plan_with_content(plan, sections, drills);
        Ok(created)
    }
}

#[async_trait]
impl SeasonStore for MemoryStores {
    async fn get(&self, id: Uuid) -> Result<Option<Season>> {
        Ok(self.state.seasons.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl SeasonSectionStore for MemoryStores {
    async fn list_sections(&self, season_id: Uuid) -> Result<Vec<SeasonSection>> {
        let mut sections: Vec<SeasonSection> = self
            .state
            .sections
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.season_id == season_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.display_order);
        Ok(sections)
    }

    async fn list_defaults(&self, section_id: Uuid) -> Result<Vec<SectionDefault>> {
        Ok(self
            .state
            .defaults
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.season_section_id == section_id)
            .cloned()
            .collect())
    }

    async fn list_links(&self, section_id: Uuid) -> Result<Vec<SectionLink>> {
        let mut links: Vec<SectionLink> = self
            .state
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.season_section_id == section_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.order_in_section);
        Ok(links)
    }
}

#[async_trait]
impl SeasonMarkerStore for MemoryStores {
    async fn list_markers(&self, season_id: Uuid) -> Result<Vec<SeasonMarker>> {
        let mut markers: Vec<SeasonMarker> = self
            .state
            .markers
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.season_id == season_id)
            .cloned()
            .collect();
        markers.sort_by_key(|m| m.start_date);
        Ok(markers)
    }
}

#[async_trait]
impl GenerationLogStore for MemoryStores {
    async fn insert(&self, new: &NewGenerationLog) -> Result<GenerationLog> {
        let log = GenerationLog {
            id: Uuid::new_v4(),
            recurrence_id: new.recurrence_id,
            generated_count: new.generated_count,
            skipped_count: new.skipped_count,
            start_date: new.start_date,
            end_date: new.end_date,
            generated_plan_ids: new.generated_plan_ids.clone(),
            skip_reasons: new.skip_reasons.clone(),
            generated_by: new.generated_by,
            created_at: Utc::now(),
        };
        self.state.logs.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn list_by_recurrence(&self, recurrence_id: Uuid) -> Result<Vec<GenerationLog>> {
        let mut logs: Vec<GenerationLog> = self
            .state
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.recurrence_id == recurrence_id)
            .cloned()
            .collect();
        logs.sort_by_key(|l| std::cmp::Reverse(l.created_at));
        Ok(logs)
    }
}

// ---------------------------------------------------------------------------
// Fixture builders
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` literal. Panics on bad input; fixtures only.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|_| panic!("bad fixture date: {s}"))
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn make_season(team_id: Uuid, start: &str, end: &str) -> Season {
    Season {
        id: Uuid::new_v4(),
        team_id,
        name: "Test season".to_string(),
        start_date: date(start),
        end_date: date(end),
        template_plan_id: None,
        created_at: epoch(),
    }
}

pub fn make_recurrence(season: &Season, pattern: PatternKind) -> RecurrencePattern {
    RecurrencePattern {
        id: Uuid::new_v4(),
        season_id: season.id,
        team_id: season.team_id,
        pattern,
        day_of_week: vec![],
        day_of_month: vec![],
        time_of_day: None,
        duration_minutes: 90,
        template_plan_id: None,
        skip_dates: vec![],
        skip_markers: true,
        is_active: true,
        created_by: Uuid::new_v4(),
        created_at: epoch(),
    }
}

pub fn make_weekly_recurrence(season: &Season, day_of_week: &[i16]) -> RecurrencePattern {
    let mut recurrence = make_recurrence(season, PatternKind::Weekly);
    recurrence.day_of_week = day_of_week.to_vec();
    recurrence
}

pub fn make_section(
    season: &Season,
    name: &str,
    start: &str,
    end: &str,
    display_order: i32,
) -> SeasonSection {
    SeasonSection {
        id: Uuid::new_v4(),
        season_id: season.id,
        name: name.to_string(),
        start_date: date(start),
        end_date: date(end),
        display_order,
        overview_visible_to_members: true,
        created_at: epoch(),
    }
}

pub fn make_default(
    section: &SeasonSection,
    name: &str,
    order: Option<i32>,
    goals: &[&str],
    notes: Option<&str>,
) -> SectionDefault {
    SectionDefault {
        id: Uuid::new_v4(),
        season_section_id: section.id,
        section_name: name.to_string(),
        section_order: order,
        goals: goals.iter().map(|g| g.to_string()).collect(),
        notes: notes.map(str::to_string),
    }
}

pub fn make_drill_link(section: &SeasonSection, name: &str, drill_id: Uuid) -> SectionLink {
    SectionLink {
        id: Uuid::new_v4(),
        season_section_id: section.id,
        kind: LinkKind::Drill,
        drill_id: Some(drill_id),
        formation_id: None,
        drill_name: Some(name.to_string()),
        formation_name: None,
        default_duration_minutes: None,
        order_in_section: 0,
        default_section_id: None,
    }
}

pub fn make_marker(season: &Season, kind: MarkerKind, start: &str, end: &str) -> SeasonMarker {
    SeasonMarker {
        id: Uuid::new_v4(),
        season_id: season.id,
        title: "Fixture marker".to_string(),
        kind,
        start_date: date(start),
        end_date: date(end),
    }
}

pub fn make_plan(team_id: Uuid, scheduled: &str, name: &str) -> PracticePlan {
    PracticePlan {
        id: Uuid::new_v4(),
        team_id,
        season_id: None,
        name: name.to_string(),
        description: None,
        scheduled_date: date(scheduled),
        start_time: None,
        created_by: Uuid::new_v4(),
        created_at: epoch(),
    }
}
