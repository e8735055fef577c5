//! Paginated full-text search over the instrument document store.

use super::SearchError;
use super::hydrate::Hydrator;
use super::normalize::search_terms;
use crate::cache::parse_exchange;
use crate::models::SearchResultRecord;
use crate::scrip::{Exchange, InstrumentRecord};
use crate::scrip::derive::to_result_record;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// A store of instrument documents with full-text search.
#[async_trait]
pub trait InstrumentDocuments: Send + Sync {
    /// Returns page `page` (1-based) of `page_size` records in which every
    /// term is a prefix of some word, highest `instIdentifier` first. A page
    /// whose offset does not fit the store's range is empty.
    async fn full_text_search(
        &self,
        terms: &[String],
        exchange: Option<Exchange>,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<InstrumentRecord>, SearchError>;
}

/// Search path kept for older clients. Alternates are found by ISIN.
#[derive(Clone)]
pub struct LegacySearcher {
    documents: Option<Arc<dyn InstrumentDocuments>>,
    hydrator: Hydrator,
    page_size: usize,
}

impl LegacySearcher {
    /// Creates a searcher. Without a document store every search fails with
    /// [`SearchError::Unavailable`].
    #[must_use]
    pub fn new(
        documents: Option<Arc<dyn InstrumentDocuments>>,
        hydrator: Hydrator,
        page_size: usize,
    ) -> Self {
        Self {
            documents,
            hydrator,
            page_size,
        }
    }

    /// Runs a search. Page 0 is treated as page 1; an unknown exchange
    /// returns an empty list.
    ///
    /// # Errors
    /// Fails if no document store is configured or the store fails.
    pub async fn search(
        &self,
        text: &str,
        exchange: Option<&str>,
        page: usize,
    ) -> Result<Vec<SearchResultRecord>, SearchError> {
        let documents = self.documents.as_ref().ok_or(SearchError::Unavailable)?;
        let Some(terms) = search_terms(text) else {
            debug!(text, "Legacy query rejected by normalization");
            return Ok(Vec::new());
        };
        let exchange = match parse_exchange(exchange) {
            Ok(exchange) => exchange,
            Err(raw) => {
                debug!(exchange = raw, "Unknown exchange, no legacy search issued");
                return Ok(Vec::new());
            }
        };

        let records = documents
            .full_text_search(&terms, exchange, page.max(1), self.page_size)
            .await?;

        let alternates = join_all(
            records
                .iter()
                .map(|record| self.hydrator.alternate_by_isin(record)),
        )
        .await;

        Ok(records
            .iter()
            .zip(alternates)
            .map(|(record, alternate)| to_result_record(record, alternate.as_ref()))
            .collect())
    }
}
