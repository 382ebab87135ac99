//! Persistence layer modules.

pub mod analytics_repo;
pub mod db;
pub mod ledger;
pub mod notification_repo;
pub mod patient_repo;
pub mod queue_repo;
pub mod schema;
pub mod settings_repo;
pub mod template_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;
