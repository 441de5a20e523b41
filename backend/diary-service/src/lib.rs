/// Diary Service Library
///
/// Social diary backend: users write posts, comment on them, like or dislike
/// them and subscribe to each other.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Rows and input records
/// - `services`: Business logic layer
/// - `db`: Repository port and its PostgreSQL / in-memory adapters
/// - `middleware`: Authentication, acting-user extraction, permissions, metrics
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
