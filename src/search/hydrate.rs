//! Hydration of contract-cache keys into instrument records.
//!
//! Primary lookups are strict: a missing or malformed record fails the
//! request. Alternate lookups are enrichment and never fail the request.

use super::SearchError;
use crate::cache::ContractStore;
use crate::models::SearchResultRecord;
use crate::scrip::derive::{
    alternate_isin_key, alternate_stock_key, is_cross_exchange, to_result_record,
};
use crate::scrip::{ISIN_HASH, InstrumentRecord, STOCK_KEY_HASH};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves keys against the contract cache.
#[derive(Clone)]
pub struct Hydrator {
    contracts: Arc<dyn ContractStore>,
}

impl Hydrator {
    /// Wraps a contract store.
    #[must_use]
    pub fn new(contracts: Arc<dyn ContractStore>) -> Self {
        Self { contracts }
    }

    /// The underlying store.
    #[must_use]
    pub fn contracts(&self) -> &Arc<dyn ContractStore> {
        &self.contracts
    }

    /// Fetches a primary record from the stock-key hash.
    ///
    /// # Errors
    /// Fails if the store is unreachable or the record is missing or malformed.
    pub async fn primary(&self, key: &str) -> Result<InstrumentRecord, SearchError> {
        self.lookup(STOCK_KEY_HASH, key)
            .await?
            .ok_or_else(|| SearchError::MissingRecord(key.to_string()))
    }

    /// Fetches and decodes one hash entry. `Ok(None)` when absent.
    ///
    /// # Errors
    /// Fails if the store is unreachable or the stored JSON is malformed.
    pub async fn lookup(
        &self,
        hash: &str,
        key: &str,
    ) -> Result<Option<InstrumentRecord>, SearchError> {
        let Some(raw) = self.contracts.get_from_hash(hash, key).await? else {
            return Ok(None);
        };
        decode(key, &raw).map(Some)
    }

    /// Alternate listing referenced by `alternateToken`.
    pub async fn alternate_by_token(&self, record: &InstrumentRecord) -> Option<InstrumentRecord> {
        let key = alternate_stock_key(record)?;
        self.resolve_alternate(record, STOCK_KEY_HASH, &key).await
    }

    /// Alternate listing of the same ISIN on the other primary exchange.
    pub async fn alternate_by_isin(&self, record: &InstrumentRecord) -> Option<InstrumentRecord> {
        let key = alternate_isin_key(record)?;
        self.resolve_alternate(record, ISIN_HASH, &key).await
    }

    /// Hydrates `key` and its token alternate into a result record.
    ///
    /// # Errors
    /// Fails only on primary hydration errors.
    pub async fn result_for_key(&self, key: &str) -> Result<SearchResultRecord, SearchError> {
        let record = self.primary(key).await?;
        let alternate = self.alternate_by_token(&record).await;
        Ok(to_result_record(&record, alternate.as_ref()))
    }

    async fn resolve_alternate(
        &self,
        primary: &InstrumentRecord,
        hash: &str,
        key: &str,
    ) -> Option<InstrumentRecord> {
        match self.lookup(hash, key).await {
            Ok(Some(alternate)) if is_cross_exchange(primary, &alternate) => Some(alternate),
            Ok(Some(alternate)) => {
                warn!(
                    primary = %primary.stock_key(),
                    alternate = %alternate.stock_key(),
                    "Alternate listing on the same exchange, ignoring"
                );
                None
            }
            Ok(None) => {
                debug!(hash, key, "Alternate listing not cached");
                None
            }
            Err(e) => {
                warn!(hash, key, error = %e, "Skipping alternate listing");
                None
            }
        }
    }
}

/// Decodes a stored record.
///
/// # Errors
/// Returns [`SearchError::MalformedRecord`] when the JSON does not decode.
pub fn decode(key: &str, raw: &str) -> Result<InstrumentRecord, SearchError> {
    serde_json::from_str(raw).map_err(|source| SearchError::MalformedRecord {
        key: key.to_string(),
        source,
    })
}
