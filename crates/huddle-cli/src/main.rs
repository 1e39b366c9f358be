mod config;
mod generate_cmd;
mod log_cmd;
mod preview_cmd;
mod recurrence_cmds;

use clap::{Parser, Subcommand};

use huddle_core::store::postgres::PgStores;
use huddle_core::store::Stores;
use huddle_db::pool;

use config::HuddleConfig;

#[derive(Parser)]
#[command(name = "huddle", about = "Practice schedule generation for team seasons")]
struct Cli {
    /// Database URL (overrides HUDDLE_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a huddle config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/huddle")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the huddle database (requires config file or env vars)
    DbInit,
    /// Recurrence pattern management
    Recurrence {
        #[command(subcommand)]
        command: RecurrenceCommands,
    },
    /// Preview what generation would do over a date range
    Preview {
        /// Recurrence ID to preview
        recurrence_id: String,
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,
    },
    /// Generate practice plans over a date range
    Generate {
        /// Recurrence ID to generate from
        recurrence_id: String,
        /// Range start (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: String,
        /// Range end (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: String,
        /// User ID recorded as the generator
        #[arg(long)]
        user: String,
    },
    /// Show generation audit logs for a recurrence
    Logs {
        /// Recurrence ID to show logs for
        recurrence_id: String,
    },
}

#[derive(Subcommand)]
pub enum RecurrenceCommands {
    /// List recurrence patterns for a season
    List {
        /// Season ID
        season_id: String,
    },
    /// Show one recurrence pattern
    Show {
        /// Recurrence ID
        id: String,
    },
    /// Add a recurrence pattern to a season
    Add {
        /// Season ID
        season_id: String,
        /// Pattern: weekly, biweekly, monthly, custom
        #[arg(long)]
        pattern: String,
        /// Comma-separated weekdays, 0=Sunday..6=Saturday (weekly/biweekly)
        #[arg(long)]
        days: Option<String>,
        /// Comma-separated days of month, 1..31 (monthly)
        #[arg(long)]
        month_days: Option<String>,
        /// Practice start time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Practice duration in minutes
        #[arg(long, default_value_t = 90)]
        duration: i32,
        /// Comma-separated dates (YYYY-MM-DD) to always skip
        #[arg(long)]
        skip_dates: Option<String>,
        /// Do not skip dates covered by season markers
        #[arg(long)]
        no_skip_markers: bool,
        /// Template plan ID whose content seeds each generated plan
        #[arg(long)]
        template: Option<String>,
        /// User ID recorded as the creator
        #[arg(long)]
        user: String,
    },
    /// Deactivate a recurrence pattern without deleting it
    Pause {
        /// Recurrence ID
        id: String,
    },
    /// Reactivate a paused recurrence pattern
    Resume {
        /// Recurrence ID
        id: String,
    },
    /// Remove a recurrence pattern
    Remove {
        /// Recurrence ID
        id: String,
    },
}

/// Execute the `huddle init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Next: run `huddle db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `huddle db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = HuddleConfig::resolve(cli_db_url)?;

    println!("Initializing huddle database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect to the target database.
    let db_pool = pool::create_pool(&resolved.db_config).await?;

    // 3. Run migrations.
    pool::run_migrations(&db_pool).await?;

    // 4. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    // 5. Clean shutdown.
    db_pool.close().await;

    println!("huddle db-init complete.");
    Ok(())
}

/// Connect to the database and bundle the Postgres-backed stores.
async fn connect_stores(cli_db_url: Option<&str>) -> anyhow::Result<(sqlx::PgPool, Stores)> {
    let resolved = HuddleConfig::resolve(cli_db_url)?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    let stores = PgStores::new(db_pool.clone()).into_stores();
    Ok((db_pool, stores))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Recurrence { command } => {
            let (db_pool, stores) = connect_stores(cli.database_url.as_deref()).await?;
            let result = recurrence_cmds::run_recurrence_command(command, &stores).await;
            db_pool.close().await;
            result?;
        }
        Commands::Preview {
            recurrence_id,
            from,
            to,
        } => {
            let (db_pool, stores) = connect_stores(cli.database_url.as_deref()).await?;
            let result = preview_cmd::run_preview(&stores, &recurrence_id, &from, &to).await;
            db_pool.close().await;
            result?;
        }
        Commands::Generate {
            recurrence_id,
            from,
            to,
            user,
        } => {
            let (db_pool, stores) = connect_stores(cli.database_url.as_deref()).await?;
            let result =
                generate_cmd::run_generate(&stores, &recurrence_id, &from, &to, &user).await;
            db_pool.close().await;
            result?;
        }
        Commands::Logs { recurrence_id } => {
            let (db_pool, stores) = connect_stores(cli.database_url.as_deref()).await?;
            let result = log_cmd::run_logs(&stores, &recurrence_id).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
