//! Database query functions for practice plans and their content rows.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{LinkKind, PlanDrill, PlanSection, PracticePlan};

/// Input for one section of a new practice plan.
#[derive(Debug, Clone)]
pub struct NewPlanSection {
    pub name: String,
    pub section_order: i32,
    pub goals: Vec<String>,
    pub notes: Option<String>,
}

/// Input for one drill or formation entry of a new practice plan.
#[derive(Debug, Clone)]
pub struct NewPlanDrill {
    pub kind: LinkKind,
    pub drill_id: Option<Uuid>,
    pub formation_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    /// Section the entry belongs to, by name; resolved to a `section_id`
    /// after the plan's sections are inserted.
    pub section_name: Option<String>,
    pub order_in_plan: i32,
    pub parallel_group_id: Option<String>,
    pub parallel_timeline: Option<String>,
    pub group_timelines: Option<serde_json::Value>,
}

/// Input for inserting a practice plan together with its content.
#[derive(Debug, Clone)]
pub struct NewPracticePlan {
    pub team_id: Uuid,
    pub season_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub created_by: Uuid,
    pub sections: Vec<NewPlanSection>,
    pub drills: Vec<NewPlanDrill>,
}

/// Fetch a practice plan by its ID.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<PracticePlan>> {
    let plan = sqlx::query_as::<_, PracticePlan>("SELECT * FROM practice_plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch practice plan")?;

    Ok(plan)
}

/// Fetch the practice plan scheduled for a team on a calendar date, if any.
pub async fn get_plan_by_team_and_date(
    pool: &PgPool,
    team_id: Uuid,
    date: NaiveDate,
) -> Result<Option<PracticePlan>> {
    let plan = sqlx::query_as::<_, PracticePlan>(
        "SELECT * FROM practice_plans WHERE team_id = $1 AND scheduled_date = $2",
    )
    .bind(team_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .context("failed to fetch practice plan by team and date")?;

    Ok(plan)
}

/// List a team's scheduled practice dates within an inclusive range.
pub async fn list_plan_dates_in_range(
    pool: &PgPool,
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    let rows: Vec<(NaiveDate,)> = sqlx::query_as(
        "SELECT scheduled_date FROM practice_plans \
         WHERE team_id = $1 AND scheduled_date BETWEEN $2 AND $3 \
         ORDER BY scheduled_date",
    )
    .bind(team_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .context("failed to list practice plan dates")?;

    Ok(rows.into_iter().map(|(d,)| d).collect())
}

/// Fetch a plan's content rows: sections in section order, drills in plan
/// order.
pub async fn get_plan_content(
    pool: &PgPool,
    plan_id: Uuid,
) -> Result<(Vec<PlanSection>, Vec<PlanDrill>)> {
    let sections = sqlx::query_as::<_, PlanSection>(
        "SELECT * FROM plan_sections WHERE plan_id = $1 ORDER BY section_order",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch plan sections")?;

    let drills = sqlx::query_as::<_, PlanDrill>(
        "SELECT * FROM plan_drills WHERE plan_id = $1 ORDER BY order_in_plan",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch plan drills")?;

    Ok((sections, drills))
}

/// Insert a practice plan together with its sections and drills in one
/// transaction.
///
/// Drill rows referencing a section by name are linked to the inserted
/// section row with that name. Returns the persisted plan.
pub async fn insert_plan_with_content(
    pool: &PgPool,
    new: &NewPracticePlan,
) -> Result<PracticePlan> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let plan = sqlx::query_as::<_, PracticePlan>(
        "INSERT INTO practice_plans \
         (team_id, season_id, name, description, scheduled_date, start_time, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING *",
    )
    .bind(new.team_id)
    .bind(new.season_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.scheduled_date)
    .bind(new.start_time)
    .bind(new.created_by)
    .fetch_one(&mut *tx)
    .await
    .context("failed to insert practice plan")?;

    // Insert sections first so drills can be linked by name.
    let mut section_ids: HashMap<String, Uuid> = HashMap::new();
    for section in &new.sections {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO plan_sections (plan_id, name, section_order, goals, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(plan.id)
        .bind(&section.name)
        .bind(section.section_order)
        .bind(&section.goals)
        .bind(&section.notes)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to insert plan section {:?}", section.name))?;
        section_ids.insert(section.name.to_lowercase(), id);
    }

    for drill in &new.drills {
        let section_id = drill
            .section_name
            .as_ref()
            .and_then(|name| section_ids.get(&name.to_lowercase()))
            .copied();

        sqlx::query(
            "INSERT INTO plan_drills \
             (plan_id, kind, drill_id, formation_id, name, duration_minutes, \
              section_id, section_name, order_in_plan, parallel_group_id, \
              parallel_timeline, group_timelines) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(plan.id)
        .bind(drill.kind)
        .bind(drill.drill_id)
        .bind(drill.formation_id)
        .bind(&drill.name)
        .bind(drill.duration_minutes)
        .bind(section_id)
        .bind(&drill.section_name)
        .bind(drill.order_in_plan)
        .bind(&drill.parallel_group_id)
        .bind(&drill.parallel_timeline)
        .bind(&drill.group_timelines)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("failed to insert plan drill {:?}", drill.name))?;
    }

    tx.commit().await.context("failed to commit practice plan")?;

    Ok(plan)
}
