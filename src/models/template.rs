//! Custom alert template model.

use serde::{Deserialize, Serialize};

/// A reusable SMS template with `{patient_name}`, `{position}`, and
/// `{wait_time}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AlertTemplate {
    /// Unique record identifier.
    pub id: i64,
    /// Display name shown in the reception UI.
    pub name: String,
    /// Message body with placeholders.
    pub message_template: String,
}
