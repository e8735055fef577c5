//! Index-backed scrip search.

use super::SearchError;
use super::hydrate::Hydrator;
use super::normalize::normalize;
use crate::cache::SmartCache;
use crate::models::SearchResultRecord;
use futures::future::try_join_all;
use std::collections::HashSet;
use tracing::debug;

/// One search request after transport decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw user text.
    pub text: String,
    /// Optional exchange scope.
    pub exchange: Option<String>,
    /// Pagination offset passed to the index.
    pub offset: usize,
    /// Maximum number of results.
    pub capacity: usize,
}

/// Resolves free text into ranked, hydrated instruments.
#[derive(Clone)]
pub struct ScripSearcher {
    smart: SmartCache,
    hydrator: Hydrator,
}

impl ScripSearcher {
    /// Creates a searcher over a smart cache and a hydrator.
    #[must_use]
    pub fn new(smart: SmartCache, hydrator: Hydrator) -> Self {
        Self { smart, hydrator }
    }

    /// Runs a search.
    ///
    /// Queries that do not normalize return an empty list. A prefix search
    /// with no hits is retried once as a fuzzy search.
    ///
    /// # Errors
    /// Fails if the index is unreachable or any hit cannot be hydrated.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResultRecord>, SearchError> {
        let Some(term) = normalize(&request.text) else {
            debug!(text = %request.text, "Query rejected by normalization");
            return Ok(Vec::new());
        };
        let exchange = request.exchange.as_deref();

        let mut keys = self
            .smart
            .perform_new_search(exchange, &term, request.offset, request.capacity, false)
            .await?;
        if keys.is_empty() {
            debug!(term = %term, "No prefix matches, retrying fuzzy");
            keys.extend(
                self.smart
                    .perform_new_search(exchange, &term, request.offset, request.capacity, true)
                    .await?,
            );
        }

        let keys = dedup_capped(keys, request.capacity);
        try_join_all(keys.iter().map(|key| self.hydrator.result_for_key(key))).await
    }
}

/// Drops repeated keys keeping first-seen order, then truncates.
#[must_use]
pub fn dedup_capped(keys: Vec<String>, capacity: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .take(capacity)
        .collect()
}
