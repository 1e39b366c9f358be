//! `huddle generate` command: run batch generation over a date range.

use anyhow::{Context, Result};
use uuid::Uuid;

use huddle_core::date::{format_local_date, parse_local_date};
use huddle_core::generation::batch_generate;
use huddle_core::store::{RecurrenceStore, Stores};

/// Run the generate command.
pub async fn run_generate(
    stores: &Stores,
    recurrence_id_str: &str,
    from: &str,
    to: &str,
    user_id_str: &str,
) -> Result<()> {
    let recurrence_id = Uuid::parse_str(recurrence_id_str)
        .with_context(|| format!("invalid recurrence ID: {recurrence_id_str}"))?;
    let user_id =
        Uuid::parse_str(user_id_str).with_context(|| format!("invalid user ID: {user_id_str}"))?;
    let start = parse_local_date(from)?;
    let end = parse_local_date(to)?;

    // The batch runs against the recurrence's own team.
    let recurrence = stores
        .recurrences
        .get(recurrence_id)
        .await?
        .with_context(|| format!("recurrence {recurrence_id} not found"))?;

    if !recurrence.is_active {
        anyhow::bail!(
            "recurrence {recurrence_id} is paused; run `huddle recurrence resume` first"
        );
    }

    let outcome = batch_generate(
        stores,
        recurrence_id,
        start,
        end,
        user_id,
        recurrence.team_id,
    )
    .await?;

    println!(
        "Generated {} plan(s), skipped {} date(s). Log: {}",
        outcome.generated, outcome.skipped, outcome.log.id
    );

    if !outcome.skip_reasons.is_empty() {
        println!();
        println!("Skipped dates:");
        for (date, reason) in &outcome.skip_reasons {
            println!("  {}  {}", format_local_date(*date), reason);
        }
    }

    Ok(())
}
