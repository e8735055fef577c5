//! Unit tests for error module.

use super::*;

#[test]
fn test_api_error_display() {
    let error = Error::Api {
        status: 400,
        code: "INVALID_REQUEST".to_string(),
        message: "Invalid request: capacity must be positive".to_string(),
    };

    let display = format!("{}", error);
    assert!(display.contains("400"));
    assert!(display.contains("INVALID_REQUEST"));
    assert!(display.contains("capacity must be positive"));
}

#[test]
fn test_not_found_error_display() {
    let error = Error::NotFound("no route".to_string());

    let display = format!("{}", error);
    assert!(display.contains("Not found"));
    assert!(display.contains("no route"));
}

#[test]
fn test_invalid_url_from_parse_error() {
    let parse_error = url::Url::parse("not a url").unwrap_err();
    let error: Error = parse_error.into();

    assert!(matches!(error, Error::InvalidUrl(_)));
    assert!(format!("{}", error).contains("Invalid URL"));
}

#[test]
fn test_json_error_from_serde() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();

    assert!(matches!(error, Error::Json(_)));
}
