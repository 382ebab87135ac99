//! Custom alert template repository.

use std::sync::Arc;

use crate::models::template::AlertTemplate;
use crate::{AppError, Result};

use super::db::Database;

/// Repository wrapper around `SQLite` for alert templates.
#[derive(Clone)]
pub struct TemplateRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: i64,
    name: String,
    message_template: String,
}

impl TemplateRow {
    fn into_template(self) -> AlertTemplate {
        AlertTemplate {
            id: self.id,
            name: self.name,
            message_template: self.message_template,
        }
    }
}

impl TemplateRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a new alert template.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn create(&self, name: &str, message_template: &str) -> Result<AlertTemplate> {
        let result = sqlx::query(
            "INSERT INTO alert_templates (name, message_template) VALUES (?1, ?2)",
        )
        .bind(name)
        .bind(message_template)
        .execute(self.db.as_ref())
        .await?;

        Ok(AlertTemplate {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            message_template: message_template.to_owned(),
        })
    }

    /// Retrieve a template by identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the template does not exist.
    pub async fn get_by_id(&self, template_id: i64) -> Result<AlertTemplate> {
        let row: Option<TemplateRow> =
            sqlx::query_as("SELECT * FROM alert_templates WHERE id = ?1")
                .bind(template_id)
                .fetch_optional(self.db.as_ref())
                .await?;

        row.map(TemplateRow::into_template)
            .ok_or_else(|| AppError::NotFound(format!("template {template_id} not found")))
    }

    /// List all templates ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list(&self) -> Result<Vec<AlertTemplate>> {
        let rows: Vec<TemplateRow> =
            sqlx::query_as("SELECT * FROM alert_templates ORDER BY name")
                .fetch_all(self.db.as_ref())
                .await?;
        Ok(rows.into_iter().map(TemplateRow::into_template).collect())
    }

    /// Update name and/or body of an existing template.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the template does not exist.
    pub async fn update(
        &self,
        template_id: i64,
        name: Option<&str>,
        message_template: Option<&str>,
    ) -> Result<()> {
        // Touch the row even when both fields are None so a missing id
        // still surfaces as NotFound.
        let result = sqlx::query(
            "UPDATE alert_templates
             SET name = COALESCE(?1, name),
                 message_template = COALESCE(?2, message_template)
             WHERE id = ?3",
        )
        .bind(name)
        .bind(message_template)
        .bind(template_id)
        .execute(self.db.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "template {template_id} not found"
            )));
        }
        Ok(())
    }

    /// Delete a template.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the delete fails.
    pub async fn delete(&self, template_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM alert_templates WHERE id = ?1")
            .bind(template_id)
            .execute(self.db.as_ref())
            .await?;
        Ok(())
    }
}
