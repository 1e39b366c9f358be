//! `huddle logs` command: show generation audit logs for a recurrence.

use anyhow::{Context, Result};
use uuid::Uuid;

use huddle_core::date::format_local_date;
use huddle_core::store::{GenerationLogStore, Stores};

/// Run the logs command.
pub async fn run_logs(stores: &Stores, recurrence_id_str: &str) -> Result<()> {
    let recurrence_id = Uuid::parse_str(recurrence_id_str)
        .with_context(|| format!("invalid recurrence ID: {recurrence_id_str}"))?;

    let logs = stores.logs.list_by_recurrence(recurrence_id).await?;

    if logs.is_empty() {
        println!("No generation logs for recurrence {recurrence_id}.");
        return Ok(());
    }

    for log in &logs {
        println!(
            "{}  {} .. {}  generated={} skipped={}",
            log.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_local_date(log.start_date),
            format_local_date(log.end_date),
            log.generated_count,
            log.skipped_count,
        );
        if let Some(reasons) = log.skip_reasons.as_object() {
            for (date, reason) in reasons {
                println!("    {date}  {}", reason.as_str().unwrap_or("?"));
            }
        }
    }

    Ok(())
}
