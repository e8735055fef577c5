//! Unit tests for client module.

use super::*;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_custom() {
    let config = ClientConfig {
        base_url: "http://api.example.com:9000".to_string(),
        timeout: Duration::from_secs(60),
    };

    assert_eq!(config.base_url, "http://api.example.com:9000");
    assert_eq!(config.timeout, Duration::from_secs(60));
}

// ============================================================================
// ScripClient Creation Tests
// ============================================================================

#[test]
fn test_scrip_client_new() {
    let client = ScripClient::new(ClientConfig::default());

    assert!(client.is_ok());
}

#[test]
fn test_scrip_client_base_url_trimmed() {
    let client = ScripClient::with_base_url("http://localhost:8080/").unwrap();

    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[test]
fn test_scrip_client_rejects_invalid_url() {
    let result = ScripClient::with_base_url("localhost without scheme");

    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

// ============================================================================
// URL Building Tests
// ============================================================================

#[test]
fn test_search_url_building() {
    let client = ScripClient::with_base_url("http://localhost:8080").unwrap();
    let query = SearchQuery::new("reli").exchange("NSE").offset(10);

    let url = client
        .url_with_query("/api/v2/scrips/search", &query)
        .unwrap();
    assert_eq!(
        url,
        "http://localhost:8080/api/v2/scrips/search?searchText=reli&exchange=NSE&offset=10"
    );
}

// ============================================================================
// Error Body Tests
// ============================================================================

#[test]
fn test_api_error_parses_error_body() {
    let error = api_error(
        400,
        r#"{"error":"Invalid request: capacity must be positive","code":"INVALID_REQUEST"}"#,
    );

    match error {
        Error::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "INVALID_REQUEST");
            assert!(message.contains("capacity"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_api_error_keeps_plain_body() {
    let error = api_error(502, "bad gateway");

    assert!(matches!(
        error,
        Error::Api { status: 502, ref code, ref message } if code.is_empty() && message == "bad gateway"
    ));
}
