//! PostgreSQL persistence for huddle: connection pool, embedded migrations,
//! row models, and query functions.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
