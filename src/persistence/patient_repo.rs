//! Patient repository for `SQLite` persistence.

use std::sync::Arc;

use crate::models::patient::{NewPatient, Patient};
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for patient records.
#[derive(Clone)]
pub struct PatientRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
}

impl PatientRow {
    fn into_patient(self) -> Patient {
        Patient {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
        }
    }
}

impl PatientRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new patient record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn create(&self, new: &NewPatient) -> Result<Patient> {
        let result = sqlx::query(
            "INSERT INTO patients (first_name, last_name, phone, email)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone)
        .bind(&new.email)
        .execute(self.db.as_ref())
        .await?;

        Ok(Patient {
            id: result.last_insert_rowid(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
        })
    }

    /// Retrieve a patient by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the patient does not exist.
    pub async fn get_by_id(&self, patient_id: i64) -> Result<Patient> {
        let row: Option<PatientRow> = sqlx::query_as("SELECT * FROM patients WHERE id = ?1")
            .bind(patient_id)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(PatientRow::into_patient)
            .ok_or_else(|| AppError::NotFound(format!("patient {patient_id} not found")))
    }

    /// Look up a patient by phone number (front-desk duplicate check).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Patient>> {
        let row: Option<PatientRow> =
            sqlx::query_as("SELECT * FROM patients WHERE phone = ?1 LIMIT 1")
                .bind(phone)
                .fetch_optional(self.db.as_ref())
                .await?;

        Ok(row.map(PatientRow::into_patient))
    }
}
