//! Request and response types for the scrip search API.

use serde::{Deserialize, Serialize};


// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether the contract cache answered its ping.
    pub cache: bool,
}

// ============================================================================
// Records
// ============================================================================

/// An instrument as returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRecord {
    pub token: String,
    pub exchange: String,
    pub company: String,
    pub symbol: String,
    pub isin: String,
    pub trading_symbol: String,
    pub display_name: String,
    pub series: String,
    pub segment: String,
    pub expiry: String,
    pub strike: f64,
    pub is_tradable: bool,
    pub is_mtf_eligible: bool,
    /// Same instrument on the other primary exchange.
    #[serde(rename = "Alternate", default, skip_serializing_if = "Option::is_none")]
    pub alternate: Option<Box<SearchResultRecord>>,
}

impl SearchResultRecord {
    /// `{EXCHANGE}_{TOKEN}` key of this record.
    #[must_use]
    pub fn stock_key(&self) -> String {
        format!("{}_{}", self.exchange, self.token)
    }
}

/// Envelope of record lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScripListResponse {
    pub status: bool,
    pub message: String,
    pub data: Vec<SearchResultRecord>,
}

/// Envelope of expiry listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiriesResponse {
    pub status: bool,
    pub message: String,
    pub data: Vec<String>,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Requests
// ============================================================================

/// Query of the index-backed search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl SearchQuery {
    /// Query for `text` with server defaults.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            search_text: text.to_string(),
            ..Default::default()
        }
    }

    /// Restricts the search to one exchange.
    #[must_use]
    pub fn exchange(mut self, exchange: &str) -> Self {
        self.exchange = Some(exchange.to_string());
        self
    }

    /// Sets the pagination offset.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Query of the legacy search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchQuery {
    pub search_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// 1-based page.
    pub page: usize,
}

/// Watchlist hydration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrateRequest {
    pub keys: Vec<String>,
}

/// Strike window around a price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrikeWindowQuery {
    pub price: f64,
    pub width: f64,
}
