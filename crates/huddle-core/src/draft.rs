//! Union draft building: merging a season's template plan with the
//! contributions of every overlapping season section into one in-memory
//! draft for a single date.
//!
//! The draft is an explicit value threaded through pure merge steps in a
//! fixed order: seed from template, merge default sections, merge linked
//! drills and formations, then a final stable sort. Template content is
//! deep-copied so seeding can never mutate the template plan. The draft is
//! owned exclusively by the call that builds it and is discarded after
//! persistence.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use huddle_db::models::{LinkKind, Season, SeasonSection, SectionDefault, SectionLink};

use crate::date::format_local_date;
use crate::error::EngineError;
use crate::store::{PlanContent, PracticePlanStore, SeasonSectionStore, Stores};

// ---------------------------------------------------------------------------
// Draft types
// ---------------------------------------------------------------------------

/// A section of the draft plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSection {
    pub name: String,
    pub order: i32,
    /// Ordered set: duplicates are never appended.
    pub goals: Vec<String>,
    pub notes: Option<String>,
}

/// A drill or formation entry of the draft plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftDrill {
    pub kind: LinkKind,
    pub drill_id: Option<Uuid>,
    pub formation_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    /// Section the entry belongs to, resolved by name at persistence time.
    pub section_name: Option<String>,
    pub order_in_plan: i32,
    pub parallel_group_id: Option<String>,
    pub parallel_timeline: Option<String>,
    pub group_timelines: Option<serde_json::Value>,
}

/// The in-memory combination of template and section contributions for one
/// date.
#[derive(Debug, Clone, Serialize)]
pub struct UnionDraft {
    pub team_id: Uuid,
    pub season_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub name: String,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub sections: Vec<DraftSection>,
    pub drills: Vec<DraftDrill>,
}

/// Knobs for one draft build.
#[derive(Debug, Clone)]
pub struct DraftOptions {
    /// Plan name; defaults to "Practice YYYY-MM-DD".
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    /// When false, step 2 (default-section merging) is skipped entirely.
    pub seed_default_sections: bool,
    /// Template override; falls back to the season's template plan.
    pub template_plan_id: Option<Uuid>,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            start_time: None,
            seed_default_sections: true,
            template_plan_id: None,
        }
    }
}

impl UnionDraft {
    fn empty(
        team_id: Uuid,
        season: &Season,
        scheduled_date: NaiveDate,
        options: &DraftOptions,
    ) -> Self {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("Practice {}", format_local_date(scheduled_date)));
        Self {
            team_id,
            season_id: season.id,
            scheduled_date,
            name,
            description: options.description.clone(),
            start_time: options.start_time,
            sections: Vec::new(),
            drills: Vec::new(),
        }
    }

    /// Index of the draft section whose name matches, ignoring case.
    fn find_section(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sections
            .iter()
            .position(|s| s.name.to_lowercase() == wanted)
    }

    /// Whether a drill with the same identity triple is already present.
    fn has_drill(&self, kind: LinkKind, drill_id: Option<Uuid>, formation_id: Option<Uuid>) -> bool {
        self.drills
            .iter()
            .any(|d| d.kind == kind && d.drill_id == drill_id && d.formation_id == formation_id)
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Build the union draft for one date.
///
/// `overlapping` must already be filtered to the sections whose range
/// contains `scheduled_date`, in season display order.
pub async fn build_union_draft(
    stores: &Stores,
    season: &Season,
    overlapping: &[SeasonSection],
    scheduled_date: NaiveDate,
    team_id: Uuid,
    options: &DraftOptions,
) -> Result<UnionDraft, EngineError> {
    let mut draft = UnionDraft::empty(team_id, season, scheduled_date, options);

    // 1. Seed from the template plan. A dangling reference is tolerated:
    //    the draft simply starts empty.
    let template_id = options.template_plan_id.or(season.template_plan_id);
    if let Some(template_id) = template_id {
        match stores.plans.get_content(template_id).await? {
            Some(content) => seed_from_template(&mut draft, &content),
            None => {
                tracing::debug!(
                    template_id = %template_id,
                    season_id = %season.id,
                    "template plan missing, seeding empty draft"
                );
            }
        }
    }

    // 2. Merge default sections, one overlapping section at a time, keeping
    //    an id -> name index for link resolution in step 3.
    let mut default_names: HashMap<Uuid, String> = HashMap::new();
    if options.seed_default_sections {
        for section in overlapping {
            let defaults = stores.sections.list_defaults(section.id).await?;
            for default in &defaults {
                default_names.insert(default.id, default.section_name.clone());
            }
            merge_section_defaults(&mut draft, &defaults);
        }
    } else {
        // Links may still reference defaults; index them without merging.
        for section in overlapping {
            for default in stores.sections.list_defaults(section.id).await? {
                default_names.insert(default.id, default.section_name);
            }
        }
    }

    // 3. Merge linked drills and formations.
    for section in overlapping {
        let links = stores.sections.list_links(section.id).await?;
        merge_section_links(&mut draft, &links, &default_names);
    }

    // 4. Stable sort; ties keep insertion order.
    draft.sections.sort_by_key(|s| s.order);
    draft.drills.sort_by_key(|d| d.order_in_plan);

    Ok(draft)
}

// ---------------------------------------------------------------------------
// Merge steps
// ---------------------------------------------------------------------------

/// Step 1: deep-copy template sections and drills into the draft.
fn seed_from_template(draft: &mut UnionDraft, content: &PlanContent) {
    for section in &content.sections {
        draft.sections.push(DraftSection {
            name: section.name.clone(),
            order: section.section_order,
            goals: section.goals.clone(),
            notes: section.notes.clone(),
        });
    }
    for drill in &content.drills {
        draft.drills.push(DraftDrill {
            kind: drill.kind,
            drill_id: drill.drill_id,
            formation_id: drill.formation_id,
            name: drill.name.clone(),
            duration_minutes: drill.duration_minutes,
            // Template section ids belong to the template's own rows;
            // linkage survives by name only.
            section_name: drill.section_name.clone(),
            order_in_plan: drill.order_in_plan,
            parallel_group_id: drill.parallel_group_id.clone(),
            parallel_timeline: drill.parallel_timeline.clone(),
            group_timelines: drill.group_timelines.clone(),
        });
    }
}

/// Step 2: merge one season section's default sections into the draft.
///
/// A case-insensitive name match merges: goals become the ordered set union
/// of existing and new, notes the newline-concatenation of non-empty values.
/// Without a match the default is appended, at its stated order or at the
/// end.
fn merge_section_defaults(draft: &mut UnionDraft, defaults: &[SectionDefault]) {
    for default in defaults {
        match draft.find_section(&default.section_name) {
            Some(idx) => {
                let section = &mut draft.sections[idx];
                for goal in &default.goals {
                    if !section.goals.contains(goal) {
                        section.goals.push(goal.clone());
                    }
                }
                section.notes = concat_notes(section.notes.as_deref(), default.notes.as_deref());
            }
            None => {
                let order = default
                    .section_order
                    .unwrap_or(draft.sections.len() as i32);
                draft.sections.push(DraftSection {
                    name: default.section_name.clone(),
                    order,
                    goals: dedup_goals(&default.goals),
                    notes: default
                        .notes
                        .as_deref()
                        .filter(|n| !n.trim().is_empty())
                        .map(str::to_string),
                });
            }
        }
    }
}

/// Step 3: merge one season section's linked drills and formations.
///
/// A candidate is dropped iff an existing draft drill shares the same
/// (kind, drill_id, formation_id) triple, so the same drill linked from
/// several sections appears once.
fn merge_section_links(
    draft: &mut UnionDraft,
    links: &[SectionLink],
    default_names: &HashMap<Uuid, String>,
) {
    for link in links {
        if draft.has_drill(link.kind, link.drill_id, link.formation_id) {
            continue;
        }

        let name = link
            .drill_name
            .clone()
            .or_else(|| link.formation_name.clone())
            .unwrap_or_else(|| link.kind.to_string());

        let section_name = link
            .default_section_id
            .and_then(|id| default_names.get(&id))
            .cloned();

        let order_in_plan = draft.drills.len() as i32;
        draft.drills.push(DraftDrill {
            kind: link.kind,
            drill_id: link.drill_id,
            formation_id: link.formation_id,
            name,
            duration_minutes: link.default_duration_minutes.unwrap_or(30),
            section_name,
            order_in_plan,
            parallel_group_id: None,
            parallel_timeline: None,
            group_timelines: None,
        });
    }
}

/// Newline-concatenation of the non-empty sides.
fn concat_notes(existing: Option<&str>, new: Option<&str>) -> Option<String> {
    let existing = existing.filter(|n| !n.trim().is_empty());
    let new = new.filter(|n| !n.trim().is_empty());
    match (existing, new) {
        (Some(a), Some(b)) => Some(format!("{a}\n{b}")),
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

/// First occurrence of each goal, order preserved.
fn dedup_goals(goals: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(goals.len());
    for goal in goals {
        if !out.contains(goal) {
            out.push(goal.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    use huddle_db::models::{PlanDrill, PlanSection};

    use crate::date::parse_local_date;

    fn season() -> Season {
        Season {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: "Spring 2024".to_string(),
            start_date: parse_local_date("2024-03-01").unwrap(),
            end_date: parse_local_date("2024-06-30").unwrap(),
            template_plan_id: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn empty_draft() -> UnionDraft {
        UnionDraft::empty(
            Uuid::new_v4(),
            &season(),
            parse_local_date("2024-03-04").unwrap(),
            &DraftOptions::default(),
        )
    }

    fn default_section(name: &str, order: Option<i32>, goals: &[&str], notes: Option<&str>) -> SectionDefault {
        SectionDefault {
            id: Uuid::new_v4(),
            season_section_id: Uuid::new_v4(),
            section_name: name.to_string(),
            section_order: order,
            goals: goals.iter().map(|g| g.to_string()).collect(),
            notes: notes.map(str::to_string),
        }
    }

    fn drill_link(name: &str, drill_id: Uuid) -> SectionLink {
        SectionLink {
            id: Uuid::new_v4(),
            season_section_id: Uuid::new_v4(),
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

    // -- default plan name --

    #[test]
    fn draft_name_defaults_to_practice_date() {
        let draft = empty_draft();
        assert_eq!(draft.name, "Practice 2024-03-04");
    }

    #[test]
    fn draft_name_honors_option() {
        let options = DraftOptions {
            name: Some("Captains' practice".to_string()),
            ..DraftOptions::default()
        };
        let draft = UnionDraft::empty(
            Uuid::new_v4(),
            &season(),
            parse_local_date("2024-03-04").unwrap(),
            &options,
        );
        assert_eq!(draft.name, "Captains' practice");
    }

    // -- seed_from_template --

    #[test]
    fn seed_copies_sections_and_drills() {
        let plan_id = Uuid::new_v4();
        let content = PlanContent {
            sections: vec![PlanSection {
                id: Uuid::new_v4(),
                plan_id,
                name: "Warmup".to_string(),
                section_order: 0,
                goals: vec!["Get loose".to_string()],
                notes: Some("Keep it light".to_string()),
            }],
            drills: vec![PlanDrill {
                id: Uuid::new_v4(),
                plan_id,
                kind: LinkKind::Drill,
                drill_id: Some(Uuid::new_v4()),
                formation_id: None,
                name: "Three-man weave".to_string(),
                duration_minutes: 15,
                section_id: Some(Uuid::new_v4()),
                section_name: Some("Warmup".to_string()),
                order_in_plan: 0,
                parallel_group_id: Some("g1".to_string()),
                parallel_timeline: None,
                group_timelines: None,
            }],
        };

        let mut draft = empty_draft();
        seed_from_template(&mut draft, &content);

        assert_eq!(draft.sections.len(), 1);
        assert_eq!(draft.sections[0].name, "Warmup");
        assert_eq!(draft.sections[0].goals, vec!["Get loose"]);

        assert_eq!(draft.drills.len(), 1);
        assert_eq!(draft.drills[0].name, "Three-man weave");
        assert_eq!(draft.drills[0].duration_minutes, 15);
        assert_eq!(draft.drills[0].section_name.as_deref(), Some("Warmup"));
        assert_eq!(draft.drills[0].parallel_group_id.as_deref(), Some("g1"));
    }

    // -- merge_section_defaults --

    #[test]
    fn same_name_merges_goals_as_ordered_set_union() {
        let mut draft = empty_draft();
        merge_section_defaults(
            &mut draft,
            &[default_section("Offense", Some(1), &["Spacing", "Tempo"], None)],
        );
        merge_section_defaults(
            &mut draft,
            &[default_section("OFFENSE", None, &["Tempo", "Screens"], None)],
        );

        assert_eq!(draft.sections.len(), 1);
        assert_eq!(draft.sections[0].goals, vec!["Spacing", "Tempo", "Screens"]);
    }

    #[test]
    fn same_name_concatenates_non_empty_notes() {
        let mut draft = empty_draft();
        merge_section_defaults(
            &mut draft,
            &[default_section("Defense", Some(0), &[], Some("Press early"))],
        );
        merge_section_defaults(
            &mut draft,
            &[default_section("defense", None, &[], Some("Switch on screens"))],
        );

        assert_eq!(
            draft.sections[0].notes.as_deref(),
            Some("Press early\nSwitch on screens")
        );
    }

    #[test]
    fn empty_notes_do_not_concatenate() {
        let mut draft = empty_draft();
        merge_section_defaults(
            &mut draft,
            &[default_section("Defense", Some(0), &[], Some("Press early"))],
        );
        merge_section_defaults(&mut draft, &[default_section("defense", None, &[], Some("  "))]);
        merge_section_defaults(&mut draft, &[default_section("defense", None, &[], None)]);

        assert_eq!(draft.sections[0].notes.as_deref(), Some("Press early"));
    }

    #[test]
    fn unmatched_default_appends_with_stated_order() {
        let mut draft = empty_draft();
        merge_section_defaults(&mut draft, &[default_section("Closing", Some(9), &[], None)]);
        assert_eq!(draft.sections[0].order, 9);
    }

    #[test]
    fn unmatched_default_without_order_appends_at_end() {
        let mut draft = empty_draft();
        merge_section_defaults(&mut draft, &[default_section("A", Some(0), &[], None)]);
        merge_section_defaults(&mut draft, &[default_section("B", None, &[], None)]);
        assert_eq!(draft.sections[1].order, 1);
    }

    // -- merge_section_links --

    #[test]
    fn duplicate_triple_is_dropped() {
        let drill_id = Uuid::new_v4();
        let mut draft = empty_draft();
        merge_section_links(
            &mut draft,
            &[drill_link("Box-out", drill_id)],
            &HashMap::new(),
        );
        merge_section_links(
            &mut draft,
            &[drill_link("Box-out again", drill_id)],
            &HashMap::new(),
        );

        assert_eq!(draft.drills.len(), 1);
        assert_eq!(draft.drills[0].name, "Box-out");
    }

    #[test]
    fn same_drill_id_different_kind_is_not_a_duplicate() {
        let shared_id = Uuid::new_v4();
        let mut draft = empty_draft();
        let mut formation = drill_link("Zone press", shared_id);
        formation.kind = LinkKind::Formation;
        formation.formation_id = formation.drill_id.take();
        formation.formation_name = formation.drill_name.take();

        merge_section_links(&mut draft, &[drill_link("Zone drill", shared_id)], &HashMap::new());
        merge_section_links(&mut draft, &[formation], &HashMap::new());

        assert_eq!(draft.drills.len(), 2);
    }

    #[test]
    fn display_name_falls_back_to_formation_name() {
        let mut link = drill_link("", Uuid::new_v4());
        link.drill_name = None;
        link.formation_name = Some("2-3 zone".to_string());

        let mut draft = empty_draft();
        merge_section_links(&mut draft, &[link], &HashMap::new());
        assert_eq!(draft.drills[0].name, "2-3 zone");
    }

    #[test]
    fn display_name_falls_back_to_kind_when_unnamed() {
        let mut link = drill_link("", Uuid::new_v4());
        link.drill_name = None;

        let mut draft = empty_draft();
        merge_section_links(&mut draft, &[link], &HashMap::new());
        assert_eq!(draft.drills[0].name, "drill");
    }

    #[test]
    fn duration_defaults_to_thirty() {
        let mut draft = empty_draft();
        merge_section_links(&mut draft, &[drill_link("Suicides", Uuid::new_v4())], &HashMap::new());
        assert_eq!(draft.drills[0].duration_minutes, 30);
    }

    #[test]
    fn order_in_plan_continues_from_draft_length() {
        let mut draft = empty_draft();
        draft.drills.push(DraftDrill {
            kind: LinkKind::Drill,
            drill_id: Some(Uuid::new_v4()),
            formation_id: None,
            name: "From template".to_string(),
            duration_minutes: 10,
            section_name: None,
            order_in_plan: 0,
            parallel_group_id: None,
            parallel_timeline: None,
            group_timelines: None,
        });

        merge_section_links(&mut draft, &[drill_link("Next", Uuid::new_v4())], &HashMap::new());
        assert_eq!(draft.drills[1].order_in_plan, 1);
    }

    #[test]
    fn link_resolves_default_section_by_name() {
        let default = default_section("Shooting", Some(2), &[], None);
        let mut names = HashMap::new();
        names.insert(default.id, default.section_name.clone());

        let mut link = drill_link("Catch and shoot", Uuid::new_v4());
        link.default_section_id = Some(default.id);

        let mut draft = empty_draft();
        merge_section_defaults(&mut draft, &[default]);
        merge_section_links(&mut draft, &[link], &names);

        assert_eq!(draft.drills[0].section_name.as_deref(), Some("Shooting"));
    }

    // -- helpers --

    #[test]
    fn concat_notes_cases() {
        assert_eq!(concat_notes(None, None), None);
        assert_eq!(concat_notes(Some("a"), None), Some("a".to_string()));
        assert_eq!(concat_notes(None, Some("b")), Some("b".to_string()));
        assert_eq!(concat_notes(Some("a"), Some("b")), Some("a\nb".to_string()));
        assert_eq!(concat_notes(Some(""), Some("b")), Some("b".to_string()));
    }

    #[test]
    fn dedup_goals_keeps_first_occurrence() {
        let goals = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(dedup_goals(&goals), vec!["a", "b"]);
    }
}
