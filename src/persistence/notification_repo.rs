//! Outbound notification log repository.

use std::sync::Arc;

use chrono::Utc;

use crate::models::notification::{NotificationKind, NotificationRecord};
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for the notification log.
#[derive(Clone)]
pub struct NotificationRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    queue_entry_id: i64,
    kind: String,
    phone_number: String,
    message: String,
    status: String,
    sent_at: String,
}

impl NotificationRow {
    fn into_record(self) -> Result<NotificationRecord> {
        let kind = parse_kind(&self.kind)?;
        let sent_at = chrono::DateTime::parse_from_rfc3339(&self.sent_at)
            .map_err(|e| AppError::Db(format!("invalid sent_at: {e}")))?
            .with_timezone(&Utc);
        Ok(NotificationRecord {
            id: self.id,
            queue_entry_id: self.queue_entry_id,
            kind,
            phone_number: self.phone_number,
            message: self.message,
            status: self.status,
            sent_at,
        })
    }
}

fn parse_kind(s: &str) -> Result<NotificationKind> {
    match s {
        "checkin" => Ok(NotificationKind::Checkin),
        "ready_soon" => Ok(NotificationKind::ReadySoon),
        "custom_alert" => Ok(NotificationKind::CustomAlert),
        other => Err(AppError::Db(format!("invalid notification kind: {other}"))),
    }
}

impl NotificationRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Append one outbound-message record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn record(
        &self,
        queue_entry_id: i64,
        kind: NotificationKind,
        phone_number: &str,
        message: &str,
        status: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (queue_entry_id, kind, phone_number, message, status, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(queue_entry_id)
        .bind(kind.as_str())
        .bind(phone_number)
        .bind(message)
        .bind(status)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.as_ref())
        .await?;
        Ok(())
    }

    /// Notification history for one queue entry, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_for_entry(&self, queue_entry_id: i64) -> Result<Vec<NotificationRecord>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            "SELECT * FROM notifications WHERE queue_entry_id = ?1 ORDER BY id ASC",
        )
        .bind(queue_entry_id)
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(NotificationRow::into_record).collect()
    }
}
