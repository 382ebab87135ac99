//! Append-only analytics event log.
//!
//! Best-effort sink: callers log failures at `warn` and never let an
//! event write block the primary operation.

use std::sync::Arc;

use chrono::Utc;

use crate::Result;

use super::db::Database;

/// Repository wrapper around `SQLite` for analytics events.
#[derive(Clone)]
pub struct AnalyticsRepo {
    db: Arc<Database>,
}

impl AnalyticsRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append one event (`check_in`, `completed`, `no_show`, `cancelled`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn record(
        &self,
        event_type: &str,
        patient_id: i64,
        queue_entry_id: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO analytics_events (event_type, patient_id, queue_entry_id, event_time)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(event_type)
        .bind(patient_id)
        .bind(queue_entry_id)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.as_ref())
        .await?;
        Ok(())
    }

    /// Event types recorded for one queue entry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn event_types_for_entry(&self, queue_entry_id: i64) -> Result<Vec<String>> {
        let rows: Vec<String> = sqlx::query_scalar(
            "SELECT event_type FROM analytics_events WHERE queue_entry_id = ?1 ORDER BY id ASC",
        )
        .bind(queue_entry_id)
        .fetch_all(self.db.as_ref())
        .await?;
        Ok(rows)
    }
}
