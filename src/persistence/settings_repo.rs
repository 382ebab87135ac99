//! Tenant-scoped settings repository.
//!
//! Key/value pairs seeded with defaults at bootstrap; reception can
//! change them at runtime without a restart.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::Result;

use super::db::Database;

/// Setting key for the outside-waiting notification threshold.
pub const NOTIFICATION_THRESHOLD_KEY: &str = "notification_threshold_patients";

/// Setting key for the assumed per-patient service time in minutes.
pub const DEFAULT_WAIT_TIME_KEY: &str = "default_wait_time_minutes";

/// Repository wrapper around `SQLite` for the settings table.
#[derive(Clone)]
pub struct SettingsRepo {
    db: Arc<Database>,
}

impl SettingsRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Raw setting value, if present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(self.db.as_ref())
                .await?;
        Ok(value)
    }

    /// Integer setting with a fallback for missing or malformed values.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn int_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.get(key).await? {
            Some(raw) => match raw.parse::<i64>() {
                Ok(value) => Ok(value),
                Err(err) => {
                    warn!(key, raw, ?err, "non-integer setting value, using default");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// Upsert a setting value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                           updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.as_ref())
        .await?;
        Ok(())
    }
}
