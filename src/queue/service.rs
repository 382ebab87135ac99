//! Queue entry store: creation and state transitions layered on the
//! position ledger, with best-effort analytics events.

use std::sync::Arc;

use tracing::{info, warn};

use crate::estimator;
use crate::models::entry::{CheckInReceipt, CompletionOutcome, NewCheckIn, QueueEntry};
use crate::persistence::analytics_repo::AnalyticsRepo;
use crate::persistence::db::Database;
use crate::persistence::queue_repo::{QueueRepo, WaitingEntry};
use crate::persistence::settings_repo::{self, SettingsRepo};
use crate::Result;

use super::generate_token;

/// Front door for all queue mutations.
///
/// Wraps the queue repository with token generation, wait estimation,
/// and analytics event emission. Analytics writes are best-effort: a
/// failed event write is logged and never fails the primary operation.
#[derive(Clone)]
pub struct QueueService {
    queue: QueueRepo,
    analytics: AnalyticsRepo,
    settings: SettingsRepo,
}

impl QueueService {
    /// Build the service and its repositories over one shared pool.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            queue: QueueRepo::new(Arc::clone(&db)),
            analytics: AnalyticsRepo::new(Arc::clone(&db)),
            settings: SettingsRepo::new(db),
        }
    }

    /// Direct access to the underlying queue repository.
    #[must_use]
    pub fn repo(&self) -> &QueueRepo {
        &self.queue
    }

    /// Check a patient in at the tail of the waiting queue.
    ///
    /// Generates the status token, assigns the next position, emits a
    /// `check_in` analytics event, and returns the receipt with the
    /// estimated wait.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the patient already has a waiting
    /// entry, `AppError::Db` on persistence failure.
    pub async fn check_in(&self, new: NewCheckIn) -> Result<CheckInReceipt> {
        let token = generate_token();
        let entry = self.queue.check_in(&new, &token).await?;

        self.log_event("check_in", entry.patient_id, entry.id).await;

        let rate = self
            .settings
            .int_or(
                settings_repo::DEFAULT_WAIT_TIME_KEY,
                estimator::DEFAULT_MINUTES_PER_PATIENT,
            )
            .await?;
        let estimated_wait_minutes =
            estimator::estimate_wait_at_rate(entry.position, entry.quoted_wait_minutes, rate);

        info!(
            entry_id = entry.id,
            patient_id = entry.patient_id,
            position = entry.position,
            "patient checked in"
        );

        Ok(CheckInReceipt {
            id: entry.id,
            position: entry.position,
            token: entry.token,
            estimated_wait_minutes,
        })
    }

    /// Mark the patient as called in. Idempotent; the first timestamp
    /// sticks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn call_in(&self, entry_id: i64) -> Result<()> {
        self.queue.call_in(entry_id).await
    }

    /// Set or clear the waiting-outside flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn set_waiting_outside(&self, entry_id: i64, waiting_outside: bool) -> Result<()> {
        self.queue.set_waiting_outside(entry_id, waiting_outside).await
    }

    /// Remove an entry with a terminal outcome and close the ledger gap.
    /// Emits an analytics event named after the outcome.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry does not exist.
    pub async fn complete(&self, entry_id: i64, outcome: CompletionOutcome) -> Result<QueueEntry> {
        let entry = self.queue.complete(entry_id, outcome).await?;
        self.log_event(outcome.as_str(), entry.patient_id, entry.id)
            .await;
        info!(entry_id, outcome = outcome.as_str(), "entry removed from queue");
        Ok(entry)
    }

    /// Move a waiting entry to a new position.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not waiting and
    /// `AppError::InvalidArgument` for an out-of-range target.
    pub async fn reorder(&self, entry_id: i64, new_position: i64) -> Result<()> {
        self.queue.reorder(entry_id, new_position).await
    }

    /// Room assignment: waiting → serving, vacating the waiting slot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not waiting.
    pub async fn begin_serving(&self, entry_id: i64) -> Result<()> {
        self.queue.begin_serving(entry_id).await
    }

    /// Room release: serving → waiting at the tail, call-in cleared.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the entry is not serving.
    pub async fn return_to_waiting(&self, entry_id: i64) -> Result<i64> {
        self.queue.return_to_waiting(entry_id).await
    }

    /// Resolve a status token to its waiting entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for unknown or no-longer-waiting
    /// tokens.
    pub async fn resolve_token(&self, token: &str) -> Result<QueueEntry> {
        self.queue.resolve_token(token).await
    }

    /// Estimated wait in minutes for an entry at its current position,
    /// honoring the tenant's per-patient rate setting.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the settings read fails.
    pub async fn estimated_wait(&self, entry: &QueueEntry) -> Result<i64> {
        let rate = self
            .settings
            .int_or(
                settings_repo::DEFAULT_WAIT_TIME_KEY,
                estimator::DEFAULT_MINUTES_PER_PATIENT,
            )
            .await?;
        Ok(estimator::estimate_wait_at_rate(
            entry.position,
            entry.quoted_wait_minutes,
            rate,
        ))
    }

    /// The live waiting list with patient contact details, in order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn queue_snapshot(&self) -> Result<Vec<WaitingEntry>> {
        self.queue.list_waiting().await
    }

    async fn log_event(&self, event_type: &str, patient_id: i64, entry_id: i64) {
        if let Err(err) = self.analytics.record(event_type, patient_id, entry_id).await {
            warn!(event_type, entry_id, ?err, "analytics event write failed");
        }
    }
}
