//! Queue domain service: entry lifecycle layered on the position ledger.

pub mod service;

pub use service::QueueService;

use uuid::Uuid;

/// Generate an opaque status-lookup token for a new check-in.
///
/// 16 random bytes rendered as 32 lowercase hex characters — URL-safe
/// and infeasible to guess. Treated as a bearer secret by the patient
/// status page.
#[must_use]
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
