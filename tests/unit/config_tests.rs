use std::path::PathBuf;

use waitline::{AppError, GlobalConfig};

fn minimal_toml() -> &'static str {
    r#"
[office]
name = "Dr. Smith's Office"
"#
}

#[test]
fn minimal_config_gets_defaults() {
    let config = GlobalConfig::from_toml_str(minimal_toml()).expect("parse config");
    assert_eq!(config.db_path, PathBuf::from("waitline.db"));
    assert_eq!(config.office.base_url, "http://localhost:5000");
    assert_eq!(config.sweep_interval_seconds, 30);
    assert!(!config.sms.enabled);
}

#[test]
fn full_config_round_trips() {
    let raw = r#"
db_path = "/var/lib/waitline/queue.db"
sweep_interval_seconds = 10

[office]
name = "Eastside Clinic"
address = "123 Medical Plaza, Suite 100"
phone = "(555) 123-4567"
base_url = "https://queue.eastside.example"

[sms]
enabled = true
"#;
    let config = GlobalConfig::from_toml_str(raw).expect("parse config");
    assert_eq!(config.db_path, PathBuf::from("/var/lib/waitline/queue.db"));
    assert_eq!(config.office.name, "Eastside Clinic");
    assert_eq!(config.office.base_url, "https://queue.eastside.example");
    assert_eq!(config.sweep_interval_seconds, 10);
    assert!(config.sms.enabled);
    // Credentials never come from the file.
    assert!(config.sms.account_sid.is_empty());
}

#[test]
fn empty_office_name_is_rejected() {
    let raw = r#"
[office]
name = "  "
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("should reject");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn zero_sweep_interval_is_rejected() {
    let raw = r#"
sweep_interval_seconds = 0

[office]
name = "Dr. Smith's Office"
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("should reject");
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = GlobalConfig::from_toml_str("office = ").expect_err("should reject");
    assert!(matches!(err, AppError::Config(_)));
}
