//! Queue entry model and lifecycle states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status for a queue entry.
///
/// `Completed`, `NoShow`, and `Cancelled` are terminal. `Serving` marks a
/// patient who has been taken back to a room; the entry vacates its slot
/// in the waiting order but the record stays live until completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Checked in and holding a position in the waiting order.
    Waiting,
    /// Taken back by the room-assignment workflow.
    Serving,
    /// Visit finished normally.
    Completed,
    /// Patient never answered the call-in.
    NoShow,
    /// Entry withdrawn before being seen.
    Cancelled,
}

impl QueueStatus {
    /// Whether this status ends the entry's episode.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::NoShow | Self::Cancelled)
    }

    /// Storage representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Serving => "serving",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Terminal outcome chosen when an entry is removed from the queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    /// Visit finished normally.
    Completed,
    /// Patient never answered the call-in.
    NoShow,
    /// Entry withdrawn before being seen.
    Cancelled,
}

impl CompletionOutcome {
    /// The queue status this outcome transitions the entry into.
    #[must_use]
    pub fn as_status(self) -> QueueStatus {
        match self {
            Self::Completed => QueueStatus::Completed,
            Self::NoShow => QueueStatus::NoShow,
            Self::Cancelled => QueueStatus::Cancelled,
        }
    }

    /// Storage and analytics-event representation of the outcome.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.as_status().as_str()
    }
}

/// One patient's span in the waiting queue, from check-in to completion.
///
/// The `token` is an opaque bearer secret handed to the patient at
/// check-in for unauthenticated status lookups. It is assigned once and
/// never changes (entries are never hard-deleted either — removal is a
/// status transition).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct QueueEntry {
    /// Unique record identifier.
    pub id: i64,
    /// Owning patient identifier.
    pub patient_id: i64,
    /// Linked appointment, when the visit was scheduled.
    pub appointment_id: Option<i64>,
    /// Doctor the patient is queued for, when sub-queues are in use.
    pub doctor_id: Option<i64>,
    /// 1-based slot in the waiting order. Meaningful only while
    /// `status == Waiting`; stale once the entry leaves the partition.
    pub position: i64,
    /// Current lifecycle status.
    pub status: QueueStatus,
    /// Opaque unguessable token for patient-side status lookup.
    pub token: String,
    /// Check-in timestamp.
    pub checked_in_at: DateTime<Utc>,
    /// When reception called the patient in; set once, never overwritten.
    pub called_in_at: Option<DateTime<Utc>>,
    /// When the entry reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// Reception-quoted wait override in minutes. An explicit zero is a
    /// valid quote, distinct from no quote at all.
    pub quoted_wait_minutes: Option<i64>,
    /// Patient reported they are waiting outside the office.
    pub waiting_outside: bool,
    /// An outside-waiting alert was already attempted for this episode.
    pub outside_notified: bool,
    /// Free-text reception notes.
    pub notes: Option<String>,
}

/// Parameters for a new check-in.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewCheckIn {
    /// Patient to enqueue. Must already exist.
    pub patient_id: i64,
    /// Linked appointment, if any.
    pub appointment_id: Option<i64>,
    /// Reception-quoted wait override in minutes.
    pub quoted_wait_minutes: Option<i64>,
    /// Free-text reception notes.
    pub notes: Option<String>,
    /// Doctor sub-queue, if any.
    pub doctor_id: Option<i64>,
}

impl NewCheckIn {
    /// Walk-in check-in with no appointment, quote, or notes.
    #[must_use]
    pub fn walk_in(patient_id: i64) -> Self {
        Self {
            patient_id,
            ..Self::default()
        }
    }
}

/// What the caller gets back from a successful check-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CheckInReceipt {
    /// New queue entry identifier.
    pub id: i64,
    /// Assigned 1-based waiting position.
    pub position: i64,
    /// Status-lookup token to hand to the patient.
    pub token: String,
    /// Estimated wait in minutes at check-in time.
    pub estimated_wait_minutes: i64,
}
