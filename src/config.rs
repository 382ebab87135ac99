//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Office identity used in patient-facing messages and status links.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct OfficeConfig {
    /// Display name inserted into SMS texts.
    pub name: String,
    /// Street address shown on the public display (informational only).
    #[serde(default)]
    pub address: Option<String>,
    /// Front-desk phone number (informational only).
    #[serde(default)]
    pub phone: Option<String>,
    /// Base URL prefixed to patient status links.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".into()
}

/// SMS transport configuration for the Twilio-backed messenger.
///
/// Credentials are loaded at runtime from environment variables, not
/// from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SmsConfig {
    /// Whether real SMS delivery is enabled. When false the mock
    /// messenger is used and every send is logged instead of delivered.
    #[serde(default)]
    pub enabled: bool,
    /// Twilio account SID (populated at runtime).
    #[serde(skip)]
    pub account_sid: String,
    /// Twilio auth token (populated at runtime).
    #[serde(skip)]
    pub auth_token: String,
    /// Sending phone number (populated at runtime).
    #[serde(skip)]
    pub from_number: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("waitline.db")
}

fn default_sweep_interval() -> u64 {
    30
}

/// Global configuration parsed from `waitline.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Path to the `SQLite` database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Office identity settings.
    pub office: OfficeConfig,
    /// SMS transport settings.
    #[serde(default)]
    pub sms: SmsConfig,
    /// Seconds between notification sweep ticks.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load Twilio credentials from environment variables.
    ///
    /// Reads `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`, and
    /// `TWILIO_PHONE_NUMBER`. Only required when `sms.enabled` is true.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if SMS is enabled and a credential is
    /// missing or empty.
    pub fn load_credentials(&mut self) -> Result<()> {
        if !self.sms.enabled {
            return Ok(());
        }
        self.sms.account_sid = load_credential("TWILIO_ACCOUNT_SID")?;
        self.sms.auth_token = load_credential("TWILIO_AUTH_TOKEN")?;
        self.sms.from_number = load_credential("TWILIO_PHONE_NUMBER")?;
        Ok(())
    }

    /// Path to the `SQLite` database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn validate(&self) -> Result<()> {
        if self.office.name.trim().is_empty() {
            return Err(AppError::Config("office.name must not be empty".into()));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(AppError::Config(
                "sweep_interval_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Read a single required credential from the environment.
fn load_credential(env_key: &str) -> Result<String> {
    match env::var(env_key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => {
            warn!(key = env_key, "credential env var is empty");
            Err(AppError::Config(format!("{env_key} is empty")))
        }
        Err(_) => Err(AppError::Config(format!(
            "{env_key} must be set when sms.enabled is true"
        ))),
    }
}
