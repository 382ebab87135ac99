use std::sync::Arc;

use waitline::models::patient::NewPatient;
use waitline::persistence::db;
use waitline::persistence::patient_repo::PatientRepo;
use waitline::AppError;

async fn setup() -> PatientRepo {
    let pool = Arc::new(db::connect_memory().await.expect("db connect"));
    PatientRepo::new(pool)
}

#[tokio::test]
async fn create_and_fetch_patient() {
    let patients = setup().await;
    let created = patients
        .create(&NewPatient {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: "+15550001111".into(),
            email: Some("ada@example.com".into()),
        })
        .await
        .expect("create");

    let fetched = patients.get_by_id(created.id).await.expect("fetch");
    assert_eq!(fetched, created);
    assert_eq!(fetched.full_name(), "Ada Lovelace");
}

#[tokio::test]
async fn unknown_patient_is_not_found() {
    let patients = setup().await;
    let err = patients.get_by_id(404).await.expect_err("should fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn find_by_phone() {
    let patients = setup().await;
    patients
        .create(&NewPatient {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            phone: "+15550002222".into(),
            email: None,
        })
        .await
        .expect("create");

    let found = patients.find_by_phone("+15550002222").await.expect("find");
    assert_eq!(found.map(|p| p.first_name), Some("Grace".into()));

    let missing = patients.find_by_phone("+15559999999").await.expect("find");
    assert!(missing.is_none());
}
