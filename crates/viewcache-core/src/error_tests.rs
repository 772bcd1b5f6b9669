//! Tests for `error` module

use super::config::ConfigError;
use super::error::*;

// -------------------------------------------------------------------------
// Error code tests
// -------------------------------------------------------------------------

#[test]
fn test_error_codes_are_unique() {
    // Arrange
    let errors: Vec<Error> = vec![
        Error::InvalidArgument("test".into()),
        Error::Config("test".into()),
    ];

    // Act
    let codes: Vec<&str> = errors.iter().map(Error::code).collect();

    // Assert
    let mut unique_codes = codes.clone();
    unique_codes.sort_unstable();
    unique_codes.dedup();
    assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");

    for code in &codes {
        assert!(
            code.starts_with("VCACHE-"),
            "Code {code} should start with VCACHE-"
        );
    }
}

#[test]
fn test_invalid_argument_display_includes_code() {
    // Arrange
    let err = Error::InvalidArgument("max cache size must be positive, got 0".into());

    // Act
    let display = format!("{err}");

    // Assert
    assert!(display.contains("VCACHE-001"));
    assert!(display.contains("must be positive"));
}

#[test]
fn test_invalid_argument_is_not_recoverable() {
    assert!(!Error::InvalidArgument("x".into()).is_recoverable());
    assert!(Error::Config("x".into()).is_recoverable());
}

#[test]
fn test_config_error_converts() {
    // Arrange
    let config_err = ConfigError::InvalidValue {
        key: "logging.level".to_string(),
        message: "value 'loud' is invalid".to_string(),
    };

    // Act
    let err: Error = config_err.into();

    // Assert
    assert_eq!(err.code(), "VCACHE-002");
    assert!(err.to_string().contains("logging.level"));
}
