//! Outbound notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an outbound patient notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Check-in confirmation with the status-tracking link.
    Checkin,
    /// Outside-waiting "ready soon" alert from the sweep.
    ReadySoon,
    /// Reception-triggered templated alert.
    CustomAlert,
}

impl NotificationKind {
    /// Storage representation of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkin => "checkin",
            Self::ReadySoon => "ready_soon",
            Self::CustomAlert => "custom_alert",
        }
    }
}

/// One row of the outbound notification log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NotificationRecord {
    /// Unique record identifier.
    pub id: i64,
    /// Queue entry the message was sent about.
    pub queue_entry_id: i64,
    /// Notification category.
    pub kind: NotificationKind,
    /// Destination phone number.
    pub phone_number: String,
    /// Message text as sent.
    pub message: String,
    /// Transport delivery status (`sent`, `failed`, `mock_sent`).
    pub status: String,
    /// When the send was attempted.
    pub sent_at: DateTime<Utc>,
}

/// A waiting-outside patient picked up by the notification sweep.
///
/// Joined read model: queue entry fields needed to build the message
/// plus the patient's contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCandidate {
    /// Queue entry identifier.
    pub entry_id: i64,
    /// Owning patient identifier.
    pub patient_id: i64,
    /// Current waiting position.
    pub position: i64,
    /// Patient given name.
    pub first_name: String,
    /// Patient family name.
    pub last_name: String,
    /// Destination phone number.
    pub phone: String,
}

impl NotifyCandidate {
    /// Display name used in the alert text.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Number of patients still ahead in the waiting order.
    #[must_use]
    pub fn patients_ahead(&self) -> i64 {
        self.position - 1
    }
}
