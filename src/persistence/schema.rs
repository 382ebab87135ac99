//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every server startup. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database and
/// seed default tenant settings.
///
/// Idempotent; safe to call on every startup.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS patients (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    phone           TEXT NOT NULL,
    email           TEXT
);

CREATE TABLE IF NOT EXISTS queue_entries (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id          INTEGER NOT NULL REFERENCES patients(id),
    appointment_id      INTEGER,
    doctor_id           INTEGER,
    position            INTEGER NOT NULL,
    status              TEXT NOT NULL DEFAULT 'waiting'
                        CHECK(status IN ('waiting','serving','completed','no_show','cancelled')),
    token               TEXT NOT NULL UNIQUE,
    checked_in_at       TEXT NOT NULL,
    called_in_at        TEXT,
    completed_at        TEXT,
    quoted_wait_minutes INTEGER,
    waiting_outside     INTEGER NOT NULL DEFAULT 0,
    outside_notified    INTEGER NOT NULL DEFAULT 0,
    notes               TEXT
);

CREATE TABLE IF NOT EXISTS analytics_events (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type      TEXT NOT NULL,
    patient_id      INTEGER,
    queue_entry_id  INTEGER,
    event_time      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    queue_entry_id  INTEGER NOT NULL REFERENCES queue_entries(id),
    kind            TEXT NOT NULL CHECK(kind IN ('checkin','ready_soon','custom_alert')),
    phone_number    TEXT NOT NULL,
    message         TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'sent',
    sent_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    key             TEXT NOT NULL UNIQUE,
    value           TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS alert_templates (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    message_template TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_queue_status_position ON queue_entries(status, position);
CREATE INDEX IF NOT EXISTS idx_queue_patient ON queue_entries(patient_id);
CREATE INDEX IF NOT EXISTS idx_notifications_entry ON notifications(queue_entry_id);
CREATE INDEX IF NOT EXISTS idx_events_entry ON analytics_events(queue_entry_id);

INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES
    ('notification_threshold_patients', '2', strftime('%Y-%m-%dT%H:%M:%SZ','now')),
    ('default_wait_time_minutes', '15', strftime('%Y-%m-%dT%H:%M:%SZ','now')),
    ('auto_refresh_seconds', '30', strftime('%Y-%m-%dT%H:%M:%SZ','now')),
    ('sms_enabled', 'false', strftime('%Y-%m-%dT%H:%M:%SZ','now'));
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
