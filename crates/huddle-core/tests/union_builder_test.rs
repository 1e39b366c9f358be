//! Tests for union-draft building against in-memory stores: template
//! seeding, section merging across overlapping sections, and link dedup.

use uuid::Uuid;

use huddle_core::draft::{build_union_draft, DraftOptions};
use huddle_db::models::{LinkKind, PlanDrill, PlanSection};
use huddle_test_utils::{
    date, make_default, make_drill_link, make_plan, make_season, make_section, MemoryStores,
};

fn template_fixture(stores: &MemoryStores, team_id: Uuid) -> Uuid {
    let template = make_plan(team_id, "2023-12-01", "Template plan");
    let template_id = template.id;
    let sections = vec![PlanSection {
        id: Uuid::new_v4(),
        plan_id: template_id,
        name: "Warmup".to_string(),
        section_order: 0,
        goals: vec!["Dynamic stretching".to_string()],
        notes: None,
    }];
    let drills = vec![PlanDrill {
        id: Uuid::new_v4(),
        plan_id: template_id,
        kind: LinkKind::Drill,
        drill_id: Some(Uuid::new_v4()),
        formation_id: None,
        name: "Lap run".to_string(),
        duration_minutes: 10,
        section_id: None,
        section_name: Some("Warmup".to_string()),
        order_in_plan: 0,
        parallel_group_id: None,
        parallel_timeline: None,
        group_timelines: None,
    }];
    stores.add_plan_with_content(template, sections, drills);
    template_id
}

#[tokio::test]
async fn template_seeds_sections_and_drills() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let mut season = make_season(team_id, "2024-03-01", "2024-06-30");
    season.template_plan_id = Some(template_fixture(&stores, team_id));
    stores.add_season(season.clone());

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[],
        date("2024-03-04"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(draft.sections.len(), 1);
    assert_eq!(draft.sections[0].name, "Warmup");
    assert_eq!(draft.drills.len(), 1);
    assert_eq!(draft.drills[0].name, "Lap run");
}

#[tokio::test]
async fn dangling_template_reference_seeds_empty_draft() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let mut season = make_season(team_id, "2024-03-01", "2024-06-30");
    season.template_plan_id = Some(Uuid::new_v4());
    stores.add_season(season.clone());

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[],
        date("2024-03-04"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert!(draft.sections.is_empty());
    assert!(draft.drills.is_empty());
}

#[tokio::test]
async fn template_from_options_overrides_season_template() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let mut season = make_season(team_id, "2024-03-01", "2024-06-30");
    // Season points at a dangling template; the recurrence-level override
    // points at a real one.
    season.template_plan_id = Some(Uuid::new_v4());
    let real_template = template_fixture(&stores, team_id);
    stores.add_season(season.clone());

    let options = DraftOptions {
        template_plan_id: Some(real_template),
        ..DraftOptions::default()
    };
    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[],
        date("2024-03-04"),
        team_id,
        &options,
    )
    .await
    .unwrap();

    assert_eq!(draft.sections.len(), 1);
}

#[tokio::test]
async fn overlapping_sections_merge_same_name_defaults() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let early = make_section(&season, "Fundamentals", "2024-03-01", "2024-04-15", 0);
    let late = make_section(&season, "Conditioning", "2024-03-15", "2024-05-31", 1);
    stores.add_section(early.clone());
    stores.add_section(late.clone());

    stores.add_default(make_default(
        &early,
        "Offense",
        Some(1),
        &["Spacing", "Tempo"],
        Some("Walk through first"),
    ));
    stores.add_default(make_default(
        &late,
        "offense",
        None,
        &["Tempo", "Transition"],
        Some("Full speed"),
    ));

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[early, late],
        date("2024-03-20"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(draft.sections.len(), 1);
    let section = &draft.sections[0];
    assert_eq!(section.goals, vec!["Spacing", "Tempo", "Transition"]);
    assert_eq!(section.notes.as_deref(), Some("Walk through first\nFull speed"));
}

#[tokio::test]
async fn same_drill_linked_from_two_sections_appears_once() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let a = make_section(&season, "A", "2024-03-01", "2024-04-15", 0);
    let b = make_section(&season, "B", "2024-03-15", "2024-05-31", 1);
    stores.add_section(a.clone());
    stores.add_section(b.clone());

    let shared_drill = Uuid::new_v4();
    stores.add_link(make_drill_link(&a, "Five-star passing", shared_drill));
    stores.add_link(make_drill_link(&b, "Five-star passing", shared_drill));
    stores.add_link(make_drill_link(&b, "Free throws", Uuid::new_v4()));

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[a, b],
        date("2024-03-20"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(draft.drills.len(), 2);
    let names: Vec<_> = draft.drills.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Five-star passing", "Free throws"]);
}

#[tokio::test]
async fn seed_default_sections_false_skips_section_merge_but_keeps_links() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let section = make_section(&season, "Core", "2024-03-01", "2024-06-30", 0);
    stores.add_section(section.clone());
    stores.add_default(make_default(&section, "Shooting", Some(0), &["Form"], None));
    stores.add_link(make_drill_link(&section, "Spot shooting", Uuid::new_v4()));

    let options = DraftOptions {
        seed_default_sections: false,
        ..DraftOptions::default()
    };
    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[section],
        date("2024-03-20"),
        team_id,
        &options,
    )
    .await
    .unwrap();

    assert!(draft.sections.is_empty());
    assert_eq!(draft.drills.len(), 1);
}

#[tokio::test]
async fn link_lands_in_its_default_section() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let section = make_section(&season, "Core", "2024-03-01", "2024-06-30", 0);
    stores.add_section(section.clone());

    let shooting = make_default(&section, "Shooting", Some(0), &[], None);
    let mut link = make_drill_link(&section, "Catch and shoot", Uuid::new_v4());
    link.default_section_id = Some(shooting.id);
    stores.add_default(shooting);
    stores.add_link(link);

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[section],
        date("2024-03-20"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(draft.drills[0].section_name.as_deref(), Some("Shooting"));
}

#[tokio::test]
async fn sections_and_drills_are_sorted_by_order() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let section = make_section(&season, "Core", "2024-03-01", "2024-06-30", 0);
    stores.add_section(section.clone());
    stores.add_default(make_default(&section, "Cooldown", Some(5), &[], None));
    stores.add_default(make_default(&section, "Warmup", Some(0), &[], None));

    let draft = build_union_draft(
        &stores.as_stores(),
        &season,
        &[section],
        date("2024-03-20"),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    let names: Vec<_> = draft.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Warmup", "Cooldown"]);
}
