use waitline::AppError;

#[test]
fn display_prefixes_the_error_kind() {
    assert_eq!(
        AppError::NotFound("entry 7 not found".into()).to_string(),
        "not found: entry 7 not found"
    );
    assert_eq!(
        AppError::Conflict("patient 3 is already in the queue".into()).to_string(),
        "conflict: patient 3 is already in the queue"
    );
    assert_eq!(
        AppError::InvalidArgument("position 9 outside [1, 4]".into()).to_string(),
        "invalid argument: position 9 outside [1, 4]"
    );
    assert_eq!(AppError::Sms("gateway down".into()).to_string(), "sms: gateway down");
}

#[test]
fn sqlx_errors_map_to_db() {
    let err: AppError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, AppError::Db(_)));
}

#[test]
fn toml_errors_map_to_config() {
    let parse_err = toml::from_str::<toml::Value>("= broken").expect_err("invalid toml");
    let err: AppError = parse_err.into();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn implements_std_error() {
    fn assert_error<E: std::error::Error>(_err: &E) {}
    assert_error(&AppError::Db("boom".into()));
}
