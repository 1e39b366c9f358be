//! Query functions, one module per aggregate.

pub mod generation_logs;
pub mod markers;
pub mod practice_plans;
pub mod recurrences;
pub mod season_sections;
pub mod seasons;
