//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("Missing config");

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing config"),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}

#[test]
fn test_port_error_validation() {
    let error = PortError::validation("must be positive");

    match error {
        PortError::Validation { message } => assert_eq!(message, "must be positive"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_port_error_internal_is_not_retryable() {
    let error = PortError::internal("boom");
    assert!(!error.is_transient());
    assert!(!error.is_not_found());
    assert!(error.to_string().contains("boom"));
}
