//! Patient-facing SMS text builders.
//!
//! Pure string construction; the office name and base URL come from
//! configuration.

/// Check-in confirmation with the status-tracking link.
#[must_use]
pub fn checkin_confirmation(
    patient_name: &str,
    office_name: &str,
    position: i64,
    base_url: &str,
    token: &str,
) -> String {
    format!(
        "Hi {patient_name}, you've been checked in at {office_name}. \
         You are #{position} in line. Track your wait time: {base_url}/status/{token}"
    )
}

/// Sent when the patient is next: no one ahead of them.
#[must_use]
pub fn ready_now(patient_name: &str, office_name: &str) -> String {
    format!("Hi {patient_name}, please come in now. {office_name} is ready to see you.")
}

/// Sent when the patient is inside the notification threshold but not
/// yet first in line.
#[must_use]
pub fn almost_ready(patient_name: &str, office_name: &str, patients_ahead: i64) -> String {
    format!(
        "Hi {patient_name}, you're almost up! {patients_ahead} patient(s) ahead of you \
         at {office_name}. Please be ready."
    )
}
