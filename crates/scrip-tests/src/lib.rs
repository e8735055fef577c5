//! Integration tests for the Scrip Search API.
//!
//! These tests require the API server to be running with the memory backend
//! seeded from `data/seed.json`. Configure the server URL via the
//! `API_BASE_URL` environment variable (default: `http://localhost:8080`).

use scrip_client::{ClientConfig, ScripClient, ScripListResponse};
use std::time::Duration;

/// Gets the API base URL from environment or uses default.
#[must_use]
pub fn get_api_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Creates a test client configured for the API.
///
/// # Errors
/// Returns error if client creation fails.
pub fn create_test_client() -> Result<ScripClient, scrip_client::Error> {
    ScripClient::new(ClientConfig {
        base_url: get_api_url(),
        timeout: Duration::from_secs(10),
    })
}

/// Stock keys of a list response, in order.
#[must_use]
pub fn stock_keys(response: &ScripListResponse) -> Vec<String> {
    response.data.iter().map(|r| r.stock_key()).collect()
}
