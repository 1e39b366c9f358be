//! `huddle recurrence` subcommands: list, show, add, remove.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use huddle_core::date::{format_local_date, parse_local_date};
use huddle_core::recurrence::dates::validate_pattern_fields;
use huddle_core::store::{RecurrenceStore, SeasonStore, Stores};
use huddle_db::models::{PatternKind, RecurrencePattern};
use huddle_db::queries::recurrences::NewRecurrence;

use crate::RecurrenceCommands;

/// Dispatch a recurrence subcommand.
pub async fn run_recurrence_command(command: RecurrenceCommands, stores: &Stores) -> Result<()> {
    match command {
        RecurrenceCommands::List { season_id } => run_list(stores, &season_id).await,
        RecurrenceCommands::Show { id } => run_show(stores, &id).await,
        RecurrenceCommands::Add {
            season_id,
            pattern,
            days,
            month_days,
            time,
            duration,
            skip_dates,
            no_skip_markers,
            template,
            user,
        } => {
            run_add(
                stores,
                &season_id,
                &pattern,
                days.as_deref(),
                month_days.as_deref(),
                time.as_deref(),
                duration,
                skip_dates.as_deref(),
                no_skip_markers,
                template.as_deref(),
                &user,
            )
            .await
        }
        RecurrenceCommands::Pause { id } => run_set_active(stores, &id, false).await,
        RecurrenceCommands::Resume { id } => run_set_active(stores, &id, true).await,
        RecurrenceCommands::Remove { id } => run_remove(stores, &id).await,
    }
}

async fn run_list(stores: &Stores, season_id_str: &str) -> Result<()> {
    let season_id = Uuid::parse_str(season_id_str)
        .with_context(|| format!("invalid season ID: {season_id_str}"))?;

    let recurrences = stores.recurrences.list_by_season(season_id).await?;

    if recurrences.is_empty() {
        println!("No recurrence patterns for season {season_id}.");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<8} {:<20}",
        "ID", "PATTERN", "ACTIVE", "DAYS"
    );
    println!("{}", "-".repeat(78));
    for r in &recurrences {
        println!(
            "{:<38} {:<10} {:<8} {:<20}",
            r.id,
            r.pattern,
            if r.is_active { "yes" } else { "no" },
            describe_days(r),
        );
    }

    Ok(())
}

async fn run_show(stores: &Stores, id_str: &str) -> Result<()> {
    let id = Uuid::parse_str(id_str).with_context(|| format!("invalid recurrence ID: {id_str}"))?;

    let r = stores
        .recurrences
        .get(id)
        .await?
        .with_context(|| format!("recurrence {id} not found"))?;

    println!("Recurrence: {}", r.id);
    println!("Season: {}", r.season_id);
    println!("Team: {}", r.team_id);
    println!("Pattern: {} ({})", r.pattern, describe_days(&r));
    if let Some(time) = r.time_of_day {
        println!("Time: {}", time.format("%H:%M"));
    }
    println!("Duration: {} minutes", r.duration_minutes);
    if let Some(template) = r.template_plan_id {
        println!("Template plan: {template}");
    }
    if !r.skip_dates.is_empty() {
        let skips: Vec<String> = r.skip_dates.iter().map(|d| format_local_date(*d)).collect();
        println!("Skip dates: {}", skips.join(", "));
    }
    println!("Skip markers: {}", if r.skip_markers { "yes" } else { "no" });
    println!("Active: {}", if r.is_active { "yes" } else { "no" });

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_add(
    stores: &Stores,
    season_id_str: &str,
    pattern_str: &str,
    days: Option<&str>,
    month_days: Option<&str>,
    time: Option<&str>,
    duration: i32,
    skip_dates: Option<&str>,
    no_skip_markers: bool,
    template: Option<&str>,
    user_str: &str,
) -> Result<()> {
    let season_id = Uuid::parse_str(season_id_str)
        .with_context(|| format!("invalid season ID: {season_id_str}"))?;
    let created_by =
        Uuid::parse_str(user_str).with_context(|| format!("invalid user ID: {user_str}"))?;

    let pattern: PatternKind = pattern_str
        .parse()
        .with_context(|| format!("invalid pattern {pattern_str:?}"))?;

    let day_of_week = parse_day_list(days.unwrap_or(""), 0..=6).context("invalid --days")?;
    let day_of_month =
        parse_day_list(month_days.unwrap_or(""), 1..=31).context("invalid --month-days")?;
    validate_pattern_fields(pattern, &day_of_week, &day_of_month)?;

    let time_of_day = match time {
        Some(t) => Some(
            NaiveTime::parse_from_str(t, "%H:%M")
                .with_context(|| format!("invalid time {t:?}, expected HH:MM"))?,
        ),
        None => None,
    };

    let skip_dates = parse_date_list(skip_dates.unwrap_or(""))?;

    let template_plan_id = match template {
        Some(t) => {
            Some(Uuid::parse_str(t).with_context(|| format!("invalid template plan ID: {t}"))?)
        }
        None => None,
    };

    let season = stores
        .seasons
        .get(season_id)
        .await?
        .with_context(|| format!("season {season_id} not found"))?;

    let created = stores
        .recurrences
        .create(&NewRecurrence {
            season_id,
            team_id: season.team_id,
            pattern,
            day_of_week,
            day_of_month,
            time_of_day,
            duration_minutes: duration,
            template_plan_id,
            skip_dates,
            skip_markers: !no_skip_markers,
            created_by,
        })
        .await?;

    println!("Recurrence {} created ({}).", created.id, created.pattern);
    Ok(())
}

async fn run_set_active(stores: &Stores, id_str: &str, active: bool) -> Result<()> {
    let id = Uuid::parse_str(id_str).with_context(|| format!("invalid recurrence ID: {id_str}"))?;
    stores.recurrences.set_active(id, active).await?;
    println!(
        "Recurrence {id} {}.",
        if active { "resumed" } else { "paused" }
    );
    Ok(())
}

async fn run_remove(stores: &Stores, id_str: &str) -> Result<()> {
    let id = Uuid::parse_str(id_str).with_context(|| format!("invalid recurrence ID: {id_str}"))?;
    stores.recurrences.delete(id).await?;
    println!("Recurrence {id} removed.");
    Ok(())
}

/// One-line day summary for listings.
fn describe_days(r: &RecurrencePattern) -> String {
    match r.pattern {
        PatternKind::Weekly | PatternKind::Biweekly => r
            .day_of_week
            .iter()
            .map(|d| weekday_name(*d))
            .collect::<Vec<_>>()
            .join(","),
        PatternKind::Monthly => r
            .day_of_month
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(","),
        PatternKind::Custom => "-".to_string(),
    }
}

fn weekday_name(index: i16) -> &'static str {
    match index {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "?",
    }
}

/// Parse a comma-separated day list (e.g. "1,3,5") within a range.
fn parse_day_list(input: &str, range: std::ops::RangeInclusive<i16>) -> Result<Vec<i16>> {
    let mut days = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: i16 = part
            .parse()
            .with_context(|| format!("{part:?} is not a number"))?;
        if !range.contains(&day) {
            anyhow::bail!("{day} is outside {}..={}", range.start(), range.end());
        }
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Parse a comma-separated `YYYY-MM-DD` list.
fn parse_date_list(input: &str) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        dates.push(parse_local_date(part)?);
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_list_basic() {
        assert_eq!(parse_day_list("1,3,5", 0..=6).unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_day_list("", 0..=6).unwrap(), Vec::<i16>::new());
        assert_eq!(parse_day_list(" 2 , 4 ", 0..=6).unwrap(), vec![2, 4]);
    }

    #[test]
    fn parse_day_list_dedups() {
        assert_eq!(parse_day_list("1,1,3", 0..=6).unwrap(), vec![1, 3]);
    }

    #[test]
    fn parse_day_list_rejects_out_of_range() {
        assert!(parse_day_list("7", 0..=6).is_err());
        assert!(parse_day_list("0", 1..=31).is_err());
        assert!(parse_day_list("x", 0..=6).is_err());
    }

    #[test]
    fn parse_date_list_basic() {
        let dates = parse_date_list("2024-01-08, 2024-02-14").unwrap();
        assert_eq!(dates.len(), 2);
        assert!(parse_date_list("nope").is_err());
    }
}
