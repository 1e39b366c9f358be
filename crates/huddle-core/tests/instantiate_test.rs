//! Tests for single-date plan instantiation: season bounds, the
//! existing-practice re-check, and persisted content.

use uuid::Uuid;

use huddle_core::draft::DraftOptions;
use huddle_core::generation::instantiate_for_date;
use huddle_core::EngineError;
use huddle_test_utils::{
    date, make_default, make_plan, make_season, make_section, MemoryStores,
};

#[tokio::test]
async fn date_outside_season_bounds_is_rejected() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let result = instantiate_for_date(
        &stores.as_stores(),
        season.id,
        date("2024-07-01"),
        Uuid::new_v4(),
        team_id,
        &DraftOptions::default(),
    )
    .await;

    match result {
        Err(EngineError::Validation(msg)) => {
            assert!(msg.contains("outside season bounds"), "got: {msg}");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn season_bounds_are_inclusive() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());
    let bundle = stores.as_stores();

    for day in ["2024-03-01", "2024-06-30"] {
        instantiate_for_date(
            &bundle,
            season.id,
            date(day),
            Uuid::new_v4(),
            team_id,
            &DraftOptions::default(),
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn existing_practice_is_rejected_at_instantiation() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());
    stores.add_plan(make_plan(team_id, "2024-03-04", "Already here"));

    let result = instantiate_for_date(
        &stores.as_stores(),
        season.id,
        date("2024-03-04"),
        Uuid::new_v4(),
        team_id,
        &DraftOptions::default(),
    )
    .await;

    match result {
        Err(EngineError::Validation(msg)) => {
            assert!(msg.contains("already exists"), "got: {msg}");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_season_is_not_found() {
    let stores = MemoryStores::new();

    let result = instantiate_for_date(
        &stores.as_stores(),
        Uuid::new_v4(),
        date("2024-03-04"),
        Uuid::new_v4(),
        Uuid::new_v4(),
        &DraftOptions::default(),
    )
    .await;

    match result {
        Err(EngineError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn only_sections_containing_the_date_contribute() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let march = make_section(&season, "March block", "2024-03-01", "2024-03-31", 0);
    let may = make_section(&season, "May block", "2024-05-01", "2024-05-31", 1);
    stores.add_default(make_default(&march, "From March", Some(0), &[], None));
    stores.add_default(make_default(&may, "From May", Some(0), &[], None));
    stores.add_section(march);
    stores.add_section(may);

    let created = instantiate_for_date(
        &stores.as_stores(),
        season.id,
        date("2024-03-15"),
        Uuid::new_v4(),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    let sections = stores.sections_for_plan(created.id);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name, "From March");
}

#[tokio::test]
async fn created_plan_persists_draft_content() {
    let stores = MemoryStores::new();
    let team_id = Uuid::new_v4();
    let season = make_season(team_id, "2024-03-01", "2024-06-30");
    stores.add_season(season.clone());

    let section = make_section(&season, "Core", "2024-03-01", "2024-06-30", 0);
    stores.add_default(make_default(
        &section,
        "Defense",
        Some(0),
        &["Close out", "Box out"],
        None,
    ));
    stores.add_section(section);

    let created = instantiate_for_date(
        &stores.as_stores(),
        season.id,
        date("2024-03-15"),
        Uuid::new_v4(),
        team_id,
        &DraftOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(created.name, "Practice 2024-03-15");
    let sections = stores.sections_for_plan(created.id);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].goals, vec!["Close out", "Box out"]);
}
