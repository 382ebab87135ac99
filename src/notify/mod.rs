//! Outside-waiting notifications and reception-triggered alerts.
//!
//! The [`Notifier`] owns the repositories and the SMS transport. The
//! sweep in [`sweep`] finds waiting-outside patients near the front of
//! the line and sends each one a single "ready soon" text per episode;
//! [`alerts`] covers the check-in confirmation and custom templated
//! alerts.

pub mod alerts;
pub mod messages;
pub mod messenger;
pub mod sweep;

use std::sync::Arc;

use crate::persistence::db::Database;
use crate::persistence::notification_repo::NotificationRepo;
use crate::persistence::patient_repo::PatientRepo;
use crate::persistence::queue_repo::QueueRepo;
use crate::persistence::settings_repo::SettingsRepo;
use crate::persistence::template_repo::TemplateRepo;

use messenger::Messenger;

/// Notification orchestrator: repositories plus the SMS transport.
#[derive(Clone)]
pub struct Notifier {
    queue: QueueRepo,
    patients: PatientRepo,
    settings: SettingsRepo,
    templates: TemplateRepo,
    notifications: NotificationRepo,
    messenger: Arc<dyn Messenger>,
    office_name: String,
    base_url: String,
}

impl Notifier {
    /// Build the notifier and its repositories over one shared pool.
    #[must_use]
    pub fn new(
        db: Arc<Database>,
        messenger: Arc<dyn Messenger>,
        office_name: String,
        base_url: String,
    ) -> Self {
        Self {
            queue: QueueRepo::new(Arc::clone(&db)),
            patients: PatientRepo::new(Arc::clone(&db)),
            settings: SettingsRepo::new(Arc::clone(&db)),
            templates: TemplateRepo::new(Arc::clone(&db)),
            notifications: NotificationRepo::new(db),
            messenger,
            office_name,
            base_url,
        }
    }
}
