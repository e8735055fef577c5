//! Request and response models for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Message carried by successful envelopes.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether the contract cache answered its liveness ping.
    pub cache: bool,
}

/// A search hit as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRecord {
    /// Exchange token.
    pub token: String,
    /// Exchange code.
    pub exchange: String,
    /// Company or instrument name.
    pub company: String,
    /// Base symbol.
    pub symbol: String,
    /// ISIN (empty for derivatives).
    pub isin: String,
    /// Trading symbol.
    pub trading_symbol: String,
    /// Human-readable label.
    pub display_name: String,
    /// Series.
    pub series: String,
    /// Equity, Commodities, indices or the raw exchange.
    pub segment: String,
    /// Expiry (derivatives only).
    pub expiry: String,
    /// Strike (options only).
    pub strike: f64,
    /// False for indices.
    pub is_tradable: bool,
    /// Margin trading eligibility.
    pub is_mtf_eligible: bool,
    /// Same instrument on the other primary exchange.
    #[serde(rename = "Alternate", default, skip_serializing_if = "Option::is_none")]
    #[schema(no_recursion)]
    pub alternate: Option<Box<SearchResultRecord>>,
}

/// Envelope for every list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScripListResponse {
    /// Whether the request succeeded.
    pub status: bool,
    /// Human-readable status.
    pub message: String,
    /// Matching records in rank order.
    pub data: Vec<SearchResultRecord>,
}

impl ScripListResponse {
    /// Successful envelope around `data`.
    #[must_use]
    pub fn success(data: Vec<SearchResultRecord>) -> Self {
        Self {
            status: true,
            message: SUCCESS_MESSAGE.to_string(),
            data,
        }
    }
}

/// Envelope for option-chain expiry listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpiriesResponse {
    /// Whether the request succeeded.
    pub status: bool,
    /// Human-readable status.
    pub message: String,
    /// Expiries in lexical order.
    pub data: Vec<String>,
}

impl ExpiriesResponse {
    /// Successful envelope around `data`.
    #[must_use]
    pub fn success(data: Vec<String>) -> Self {
        Self {
            status: true,
            message: SUCCESS_MESSAGE.to_string(),
            data,
        }
    }
}

/// Query parameters of the index-backed search.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ScripSearchQuery {
    /// Free-text query.
    #[serde(default)]
    pub search_text: String,
    /// Restrict to one exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Pagination offset (default: 0).
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of results (default from configuration).
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// Query parameters of the legacy document-store search.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchQuery {
    /// Free-text query.
    #[serde(default)]
    pub search_text: String,
    /// Restrict to one exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// 1-based page number (default: 1).
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

/// Request to hydrate a watchlist.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct HydrateRequest {
    /// Stock keys (`{EXCHANGE}_{TOKEN}`) in display order.
    pub keys: Vec<String>,
}

/// Strike window around a target price.
#[derive(Debug, Deserialize, IntoParams)]
pub struct OptionChainQuery {
    /// Target price, usually the underlying's last price.
    pub price: f64,
    /// Half-width of the window in price units.
    pub width: f64,
}
