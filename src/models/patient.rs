//! Patient model.

use serde::{Deserialize, Serialize};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Patient {
    /// Unique record identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Mobile number used for SMS notifications.
    pub phone: String,
    /// Contact email, if provided.
    pub email: Option<String>,
}

impl Patient {
    /// Display name used in patient-facing messages.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Parameters for registering a new patient.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewPatient {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Mobile number used for SMS notifications.
    pub phone: String,
    /// Contact email, if provided.
    pub email: Option<String>,
}
