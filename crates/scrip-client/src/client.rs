//! HTTP client for the scrip search API.

use crate::error::Error;
use crate::types::*;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[cfg(test)]
mod tests;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:8080").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Scrip Search API.
#[derive(Debug, Clone)]
pub struct ScripClient {
    client: Client,
    base_url: String,
}

impl ScripClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a new client with default configuration.
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(ClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Performs a health check.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn health_check(&self) -> Result<HealthResponse, Error> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Searches through the smart cache.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn search(&self, query: &SearchQuery) -> Result<ScripListResponse, Error> {
        let url = self.url_with_query("/api/v2/scrips/search", query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Searches through the legacy document store.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn legacy_search(
        &self,
        query: &LegacySearchQuery,
    ) -> Result<ScripListResponse, Error> {
        let url = self.url_with_query("/api/v1/scrips/search", query)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Watchlist
    // ========================================================================

    /// Hydrates watchlist keys.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn hydrate(&self, keys: &[String]) -> Result<ScripListResponse, Error> {
        let url = format!("{}/api/v1/scrips/hydrate", self.base_url);
        let request = HydrateRequest {
            keys: keys.to_vec(),
        };
        let resp = self.client.post(&url).json(&request).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Option Chain
    // ========================================================================

    /// Lists expiries of an underlying.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list_expiries(&self, underlying: &str) -> Result<ExpiriesResponse, Error> {
        let url = format!(
            "{}/api/v1/option-chain/{}/expiries",
            self.base_url, underlying
        );
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    /// Gets the options of one expiry within a strike window.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn strike_window(
        &self,
        underlying: &str,
        expiry: &str,
        window: StrikeWindowQuery,
    ) -> Result<ScripListResponse, Error> {
        let path = format!("/api/v1/option-chain/{}/{}", underlying, expiry);
        let url = self.url_with_query(&path, &window)?;
        let resp = self.client.get(&url).send().await?;
        self.handle_response(resp).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn url_with_query<Q: Serialize>(&self, path: &str, query: &Q) -> Result<String, Error> {
        let encoded = serde_urlencoded::to_string(query)?;
        Ok(format!("{}{}?{}", self.base_url, path, encoded))
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            Ok(resp.json().await?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::NotFound(text))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), &text))
        }
    }
}

/// Builds [`Error::Api`] from a status and raw body.
fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => Error::Api {
            status,
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => Error::Api {
            status,
            code: String::new(),
            message: body.to_string(),
        },
    }
}
