//! Search services built on the cache layer.
//!
//! - [`ScripSearcher`]: free-text search over the smart cache
//! - [`LegacySearcher`]: paginated full-text search over the document store
//! - [`WatchlistHydrator`]: key hydration with a daily expiry cache
//! - [`OptionChainService`]: expiries and strike windows per underlying

pub mod hydrate;
pub mod legacy;
pub mod normalize;
pub mod option_chain;
pub mod orchestrator;
pub mod watchlist;


pub use hydrate::Hydrator;
pub use legacy::{InstrumentDocuments, LegacySearcher};
pub use normalize::{normalize, search_terms, words};
pub use option_chain::OptionChainService;
pub use orchestrator::{ScripSearcher, SearchRequest};
pub use watchlist::WatchlistHydrator;

use crate::cache::CacheError;
use thiserror::Error;

/// Failures surfaced by the search services.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The contract cache or the search index failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A key returned by the index has no record in the contract cache.
    #[error("no contract record for {0}")]
    MissingRecord(String),

    /// A stored record could not be decoded.
    #[error("malformed contract record for {key}: {source}")]
    MalformedRecord {
        key: String,
        source: serde_json::Error,
    },

    /// The document store failed.
    #[error("document store error: {0}")]
    Documents(String),

    /// No document store is configured.
    #[error("document store is not configured")]
    Unavailable,
}
