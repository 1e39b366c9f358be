//! `huddle preview` command: show the per-date generation plan without
//! writing anything.

use anyhow::{Context, Result};
use uuid::Uuid;

use huddle_core::date::{format_local_date, parse_local_date};
use huddle_core::recurrence::preview::preview_generation;
use huddle_core::store::Stores;

/// Run the preview command.
pub async fn run_preview(
    stores: &Stores,
    recurrence_id_str: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let recurrence_id = Uuid::parse_str(recurrence_id_str)
        .with_context(|| format!("invalid recurrence ID: {recurrence_id_str}"))?;
    let start = parse_local_date(from)?;
    let end = parse_local_date(to)?;

    let preview = preview_generation(stores, recurrence_id, start, end).await?;

    println!(
        "Recurrence: {} ({})",
        preview.recurrence.pattern, preview.recurrence.id
    );
    println!(
        "Window: {} .. {}",
        format_local_date(start),
        format_local_date(end)
    );
    println!(
        "Dates: {} total, {} to create, {} to skip",
        preview.total_dates, preview.will_create, preview.will_skip
    );
    println!();

    println!("{:<12} {:<10} {:<8} {}", "DATE", "WEEKDAY", "CREATE", "SKIP REASON");
    println!("{}", "-".repeat(56));
    for entry in &preview.entries {
        println!(
            "{:<12} {:<10} {:<8} {}",
            format_local_date(entry.date),
            entry.weekday_label,
            if entry.will_create { "yes" } else { "no" },
            entry.skip_reason.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
