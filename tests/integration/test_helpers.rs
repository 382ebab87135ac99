use std::sync::Arc;

use waitline::models::entry::CheckInReceipt;
use waitline::models::patient::{NewPatient, Patient};
use waitline::notify::messenger::{Messenger, MockMessenger};
use waitline::notify::Notifier;
use waitline::persistence::db::{self, Database};
use waitline::persistence::patient_repo::PatientRepo;
use waitline::queue::QueueService;

pub const OFFICE: &str = "Sunrise Family Clinic";
pub const BASE_URL: &str = "http://localhost:5000";

/// Everything a front-desk scenario needs, over one in-memory database.
pub struct Clinic {
    pub db: Arc<Database>,
    pub service: QueueService,
    pub patients: PatientRepo,
    pub notifier: Arc<Notifier>,
    pub messenger: Arc<MockMessenger>,
}

pub async fn clinic() -> Clinic {
    let db = Arc::new(db::connect_memory().await.expect("db connect"));
    let messenger = Arc::new(MockMessenger::new());
    let notifier = Arc::new(Notifier::new(
        Arc::clone(&db),
        Arc::clone(&messenger) as Arc<dyn Messenger>,
        OFFICE.into(),
        BASE_URL.into(),
    ));
    Clinic {
        service: QueueService::new(Arc::clone(&db)),
        patients: PatientRepo::new(Arc::clone(&db)),
        notifier,
        messenger,
        db,
    }
}

impl Clinic {
    pub async fn register(&self, first_name: &str, phone: &str) -> Patient {
        self.patients
            .create(&NewPatient {
                first_name: first_name.into(),
                last_name: "Patient".into(),
                phone: phone.into(),
                email: None,
            })
            .await
            .expect("create patient")
    }

    pub async fn walk_in(&self, patient_id: i64) -> CheckInReceipt {
        self.service
            .check_in(waitline::models::entry::NewCheckIn::walk_in(patient_id))
            .await
            .expect("check in")
    }
}
