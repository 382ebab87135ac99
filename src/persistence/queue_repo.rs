//! Queue entry repository for `SQLite` persistence.
//!
//! Every mutation that touches the waiting order runs inside a single
//! transaction together with its ledger shift, so concurrent callers
//! only ever observe a dense `{1..N}` numbering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::models::entry::{CompletionOutcome, NewCheckIn, QueueEntry, QueueStatus};
use crate::models::notification::NotifyCandidate;
use crate::{AppError, Result};

use super::db::Database;
use super::ledger;

/// Repository wrapper around `SQLite` for queue entry records.
#[derive(Clone)]
pub struct QueueRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct QueueEntryRow {
    id: i64,
    patient_id: i64,
    appointment_id: Option<i64>,
    doctor_id: Option<i64>,
    position: i64,
    status: String,
    token: String,
    checked_in_at: String,
    called_in_at: Option<String>,
    completed_at: Option<String>,
    quoted_wait_minutes: Option<i64>,
    waiting_outside: bool,
    outside_notified: bool,
    notes: Option<String>,
}

impl QueueEntryRow {
    /// Convert a database row into the domain model.
    fn into_entry(self) -> Result<QueueEntry> {
        Ok(QueueEntry {
            id: self.id,
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            doctor_id: self.doctor_id,
            position: self.position,
            status: parse_status(&self.status)?,
            token: self.token,
            checked_in_at: parse_timestamp(&self.checked_in_at, "checked_in_at")?,
            called_in_at: parse_timestamp_opt(self.called_in_at.as_deref(), "called_in_at")?,
            completed_at: parse_timestamp_opt(self.completed_at.as_deref(), "completed_at")?,
            quoted_wait_minutes: self.quoted_wait_minutes,
            waiting_outside: self.waiting_outside,
            outside_notified: self.outside_notified,
            notes: self.notes,
        })
    }
}

/// Joined read model for the live queue display: entry plus the
/// patient's contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    /// The queue entry itself.
    pub entry: QueueEntry,
    /// Patient given name.
    pub first_name: String,
    /// Patient family name.
    pub last_name: String,
    /// Patient phone number.
    pub phone: String,
    /// Patient email, if provided.
    pub email: Option<String>,
}

/// Internal row struct for the waiting-list join.
#[derive(sqlx::FromRow)]
struct WaitingRow {
    #[sqlx(flatten)]
    entry: QueueEntryRow,
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
}

impl WaitingRow {
    fn into_waiting_entry(self) -> Result<WaitingEntry> {
        Ok(WaitingEntry {
            entry: self.entry.into_entry()?,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
        })
    }
}

fn parse_status(s: &str) -> Result<QueueStatus> {
    match s {
        "waiting" => Ok(QueueStatus::Waiting),
        "serving" => Ok(QueueStatus::Serving),
        "completed" => Ok(QueueStatus::Completed),
        "no_show" => Ok(QueueStatus::NoShow),
        "cancelled" => Ok(QueueStatus::Cancelled),
        other => Err(AppError::Db(format!("invalid queue status: {other}"))),
    }
}

fn parse_timestamp(s: &str, field: &str) -> Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid {field}: {e}")))
}

fn parse_timestamp_opt(s: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    s.map(|raw| parse_timestamp(raw, field)).transpose()
}

/// Fetch one entry by id inside an open connection/transaction.
async fn fetch_entry(conn: &mut SqliteConnection, entry_id: i64) -> Result<Option<QueueEntry>> {
    let row: Option<QueueEntryRow> =
        sqlx::query_as("SELECT * FROM queue_entries WHERE id = ?1")
            .bind(entry_id)
            .fetch_optional(&mut *conn)
            .await?;
    row.map(QueueEntryRow::into_entry).transpose()
}

impl QueueRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new waiting entry at the tail of the queue.
    ///
    /// The position assignment, the duplicate-check-in guard, and the
    /// insert commit atomically.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the patient already has a waiting
    /// entry, `AppError::Db` on persistence failure.
    pub async fn check_in(&self, new: &NewCheckIn, token: &str) -> Result<QueueEntry> {
        let mut tx = self.db.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM queue_entries WHERE patient_id = ?1 AND status = 'waiting'",
        )
        .bind(new.patient_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "patient {} is already in the queue",
                new.patient_id
            )));
        }

        let position = ledger::next_position(&mut tx).await?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO queue_entries
             (patient_id, appointment_id, doctor_id, position, status, token,
              checked_in_at, quoted_wait_minutes, notes)
             VALUES (?1, ?2, ?3, ?4, 'waiting', ?5, ?6, ?7, ?8)",
        )
        .bind(new.patient_id)
        .bind(new.appointment_id)
        .bind(new.doctor_id)
        .bind(position)
        .bind(token)
        .bind(now.to_rfc3339())
        .bind(new.quoted_wait_minutes)
        .bind(&new.notes)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        tx.commit().await?;

        Ok(QueueEntry {
            id,
            patient_id: new.patient_id,
            appointment_id: new.appointment_id,
            doctor_id: new.doctor_id,
            position,
            status: QueueStatus::Waiting,
            token: token.to_owned(),
            checked_in_at: now,
            called_in_at: None,
            completed_at: None,
            quoted_wait_minutes: new.quoted_wait_minutes,
            waiting_outside: false,
            outside_notified: false,
            notes: new.notes.clone(),
        })
    }

    /// Retrieve an entry by identifier.
    ///
    /// Returns `Ok(None)` if the entry does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn get_by_id(&self, entry_id: i64) -> Result<Option<QueueEntry>> {
        let mut conn = self.db.acquire().await?;
        fetch_entry(&mut conn, entry_id).await
    }

    /// Resolve a patient-side status token to its waiting entry.
    ///
    /// Tokens of completed, no-show, or cancelled entries stop resolving
    /// — status pages go dark once a visit ends.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for unknown tokens or tokens whose
    /// entry is no longer waiting.
    pub async fn resolve_token(&self, token: &str) -> Result<QueueEntry> {
        let row: Option<QueueEntryRow> = sqlx::query_as(
            "SELECT * FROM queue_entries WHERE token = ?1 AND status = 'waiting'",
        )
        .bind(token)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(QueueEntryRow::into_entry)
            .transpose()?
            .ok_or_else(|| AppError::NotFound("no waiting entry for token".into()))
    }

    /// List the waiting partition with patient contact details, ordered
    /// by position.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_waiting(&self) -> Result<Vec<WaitingEntry>> {
        let rows: Vec<WaitingRow> = sqlx::query_as(
            "SELECT q.id, q.patient_id, q.appointment_id, q.doctor_id, q.position,
                    q.status, q.token, q.checked_in_at, q.called_in_at, q.completed_at,
                    q.quoted_wait_minutes, q.waiting_outside, q.outside_notified, q.notes,
                    p.first_name, p.last_name, p.phone, p.email
             FROM queue_entries q
             JOIN patients p ON q.patient_id = p.id
             WHERE q.status = 'waiting'
             ORDER BY q.position ASC",
        )
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(WaitingRow::into_waiting_entry).collect()
    }

    /// Current waiting positions, ascending. Diagnostic read used by the
    /// display feed and invariant checks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn waiting_positions(&self) -> Result<Vec<i64>> {
        let rows: Vec<i64> = sqlx::query_scalar(
            "SELECT position FROM queue_entries WHERE status = 'waiting' ORDER BY position ASC",
        )
        .fetch_all(self.db.as_ref())
        .await?;
        Ok(rows)
    }

    /// Stamp `called_in_at` if it is still unset. Idempotent: repeat
    /// calls never overwrite the first timestamp.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn call_in(&self, entry_id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE queue_entries SET called_in_at = COALESCE(called_in_at, ?1) WHERE id = ?2",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(entry_id)
        .execute(self.db.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("entry {entry_id} not found")));
        }
        Ok(())
    }

    /// Set or clear the waiting-outside flag. Does not touch positions
    /// or the notified flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn set_waiting_outside(&self, entry_id: i64, waiting_outside: bool) -> Result<()> {
        let result = sqlx::query("UPDATE queue_entries SET waiting_outside = ?1 WHERE id = ?2")
            .bind(waiting_outside)
            .bind(entry_id)
            .execute(self.db.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("entry {entry_id} not found")));
        }
        Ok(())
    }

    /// Update the reception-quoted wait override.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn set_quoted_wait(&self, entry_id: i64, minutes: Option<i64>) -> Result<()> {
        let result =
            sqlx::query("UPDATE queue_entries SET quoted_wait_minutes = ?1 WHERE id = ?2")
                .bind(minutes)
                .bind(entry_id)
                .execute(self.db.as_ref())
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("entry {entry_id} not found")));
        }
        Ok(())
    }

    /// Replace the free-text reception notes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn set_notes(&self, entry_id: i64, notes: Option<&str>) -> Result<()> {
        let result = sqlx::query("UPDATE queue_entries SET notes = ?1 WHERE id = ?2")
            .bind(notes)
            .bind(entry_id)
            .execute(self.db.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("entry {entry_id} not found")));
        }
        Ok(())
    }

    /// Move a waiting entry to a new position, shifting neighbors.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not waiting and
    /// `AppError::InvalidArgument` if the target position is out of range.
    pub async fn reorder(&self, entry_id: i64, new_position: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;
        ledger::move_to(&mut tx, entry_id, new_position).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Remove an entry from the queue with a terminal outcome.
    ///
    /// Stamps `completed_at`, backfills `called_in_at` when still unset
    /// (wait-time analytics expect every finished entry to carry one),
    /// and closes the waiting-order gap if the entry held a slot.
    /// Completing an already-terminal entry is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn complete(&self, entry_id: i64, outcome: CompletionOutcome) -> Result<QueueEntry> {
        let mut tx = self.db.begin().await?;

        let current = fetch_entry(&mut tx, entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("entry {entry_id} not found")))?;

        if current.status.is_terminal() {
            return Ok(current);
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE queue_entries
             SET status = ?1, completed_at = ?2, called_in_at = COALESCE(called_in_at, ?2)
             WHERE id = ?3",
        )
        .bind(outcome.as_str())
        .bind(&now)
        .bind(entry_id)
        .execute(&mut *tx)
        .await?;

        // Serving entries vacated their slot when they went back to a room.
        if current.status == QueueStatus::Waiting {
            ledger::close_gap(&mut tx, current.position).await?;
        }

        let updated = fetch_entry(&mut tx, entry_id)
            .await?
            .ok_or_else(|| AppError::Db(format!("entry {entry_id} vanished mid-update")))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Transition a waiting entry to `serving` (room assignment).
    ///
    /// Stamps `called_in_at` if unset and closes the waiting-order gap —
    /// a patient in a room no longer holds a slot in the line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not currently waiting.
    pub async fn begin_serving(&self, entry_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let position = ledger::waiting_position(&mut tx, entry_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("waiting entry {entry_id} not found")))?;

        sqlx::query(
            "UPDATE queue_entries
             SET status = 'serving', called_in_at = COALESCE(called_in_at, ?1)
             WHERE id = ?2",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(entry_id)
        .execute(&mut *tx)
        .await?;

        ledger::close_gap(&mut tx, position).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Reset a serving entry back to the waiting line (room release).
    ///
    /// Clears `called_in_at` and re-enters the ledger at the tail. This
    /// is a compensating reset within the same episode: the
    /// outside-notified flag stays as it is.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not currently serving.
    pub async fn return_to_waiting(&self, entry_id: i64) -> Result<i64> {
        let mut tx = self.db.begin().await?;

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM queue_entries WHERE id = ?1")
                .bind(entry_id)
                .fetch_optional(&mut *tx)
                .await?;
        match status.as_deref() {
            Some("serving") => {}
            Some(_) | None => {
                return Err(AppError::NotFound(format!(
                    "serving entry {entry_id} not found"
                )));
            }
        }

        let position = ledger::next_position(&mut tx).await?;
        sqlx::query(
            "UPDATE queue_entries
             SET status = 'waiting', position = ?1, called_in_at = NULL
             WHERE id = ?2",
        )
        .bind(position)
        .bind(entry_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(position)
    }

    /// Waiting-outside patients within the notification threshold who
    /// have not been notified yet this episode, front of the line first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn find_eligible(&self, threshold: i64) -> Result<Vec<NotifyCandidate>> {
        let rows: Vec<(i64, i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT q.id, q.patient_id, q.position, p.first_name, p.last_name, p.phone
             FROM queue_entries q
             JOIN patients p ON q.patient_id = p.id
             WHERE q.status = 'waiting'
               AND q.waiting_outside = 1
               AND q.outside_notified = 0
               AND q.position <= ?1
             ORDER BY q.position ASC",
        )
        .bind(threshold)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(entry_id, patient_id, position, first_name, last_name, phone)| NotifyCandidate {
                    entry_id,
                    patient_id,
                    position,
                    first_name,
                    last_name,
                    phone,
                },
            )
            .collect())
    }

    /// Latch the outside-notified flag. Monotonic within an episode — a
    /// single UPDATE, so concurrent sweeps cannot lose the set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn mark_notified(&self, entry_id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE queue_entries SET outside_notified = 1 WHERE id = ?1")
            .bind(entry_id)
            .execute(self.db.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("entry {entry_id} not found")));
        }
        Ok(())
    }
}
