//! Outside-waiting notification sweep.
//!
//! Finds waiting entries flagged `waiting_outside` within the tenant's
//! position threshold and sends each one a single alert per episode.
//! The notified flag is latched whether or not the send succeeds: this
//! is an at-most-once-attempt policy, chosen so a flaky gateway can
//! never spam a patient.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::models::notification::NotificationKind;
use crate::persistence::settings_repo::NOTIFICATION_THRESHOLD_KEY;
use crate::Result;

use super::{messages, Notifier};

/// Default position threshold when the tenant setting is missing.
pub const DEFAULT_THRESHOLD: i64 = 2;

impl Notifier {
    /// Run one notification sweep; returns how many patients were
    /// processed.
    ///
    /// The read-then-mark sequence is not atomic as a whole — two
    /// overlapping sweeps can in rare cases both attempt the same entry,
    /// which is tolerated. Each entry's flag latch is a single UPDATE.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the candidate query or flag update
    /// fails. Send failures are logged, not propagated.
    pub async fn run_sweep(&self) -> Result<usize> {
        let threshold = self
            .settings
            .int_or(NOTIFICATION_THRESHOLD_KEY, DEFAULT_THRESHOLD)
            .await?;

        let candidates = self.queue.find_eligible(threshold).await?;
        let count = candidates.len();

        for candidate in candidates {
            let name = candidate.full_name();
            let ahead = candidate.patients_ahead();
            let text = if ahead == 0 {
                messages::ready_now(&name, &self.office_name)
            } else {
                messages::almost_ready(&name, &self.office_name, ahead)
            };

            let receipt = self.messenger.send(&candidate.phone, &text).await;
            if !receipt.is_success() {
                warn!(
                    entry_id = candidate.entry_id,
                    error = receipt.error.as_deref().unwrap_or("unknown"),
                    "ready-soon send failed; flag is latched anyway"
                );
            }

            // Latch first-class: even a failed send consumes the one
            // notification this episode gets.
            self.queue.mark_notified(candidate.entry_id).await?;

            if let Err(err) = self
                .notifications
                .record(
                    candidate.entry_id,
                    NotificationKind::ReadySoon,
                    &candidate.phone,
                    &text,
                    receipt.status.as_str(),
                )
                .await
            {
                warn!(entry_id = candidate.entry_id, ?err, "notification log write failed");
            }

            info!(
                entry_id = candidate.entry_id,
                position = candidate.position,
                status = receipt.status.as_str(),
                "outside-waiting alert processed"
            );
        }

        Ok(count)
    }
}

/// Spawn the periodic sweep driver.
///
/// Ticks every `interval`; each tick runs one sweep and logs failures.
/// The sweep stays independently invocable for the manual trigger path.
#[must_use]
pub fn spawn_sweep_task(
    notifier: Arc<Notifier>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!("notification sweep shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match notifier.run_sweep().await {
                        Ok(0) => {}
                        Ok(count) => info!(count, "notification sweep completed"),
                        Err(err) => error!(?err, "notification sweep failed"),
                    }
                }
            }
        }
    })
}
