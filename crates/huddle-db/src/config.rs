//! Database connection configuration.

use std::env;

/// Where to find the huddle database.
///
/// The URL resolves from `HUDDLE_DATABASE_URL`, with a localhost default so a
/// fresh checkout works against a local Postgres without any setup.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full PostgreSQL connection URL.
    pub database_url: String,
}

impl DbConfig {
    /// Connection URL used when nothing else is configured.
    pub const DEFAULT_URL: &str = "postgresql://localhost:5432/huddle";

    /// Read the URL from `HUDDLE_DATABASE_URL`, or fall back to
    /// [`Self::DEFAULT_URL`].
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("HUDDLE_DATABASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_URL.to_owned()),
        }
    }

    /// Wrap an explicit URL (CLI flags, tests).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// The database name, i.e. the final path segment of the URL.
    pub fn database_name(&self) -> Option<&str> {
        let (_, name) = self.split_url()?;
        Some(name)
    }

    /// The same host and credentials, pointed at the `postgres` maintenance
    /// database. `CREATE DATABASE` has to be issued from there.
    pub fn maintenance_url(&self) -> String {
        match self.split_url() {
            Some((prefix, _)) => format!("{prefix}/postgres"),
            None => self.database_url.clone(),
        }
    }

    /// Split `scheme://host:port/dbname` at the last slash.
    fn split_url(&self) -> Option<(&str, &str)> {
        self.database_url
            .rsplit_once('/')
            .filter(|(_, name)| !name.is_empty())
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
