//! Option-chain lookups over the contract cache sorted sets.

use super::SearchError;
use super::hydrate::Hydrator;
use crate::models::SearchResultRecord;
use futures::future::try_join_all;

/// Sorted set of `{UNDERLYING}:{EXPIRY}` members.
pub const EXPIRY_SET: &str = "optionchain:expiries";

/// Sorted set of option stock keys for one expiry, scored by strike.
#[must_use]
pub fn strike_set_key(underlying: &str, expiry: &str) -> String {
    format!("optionchain:{}:{}", underlying.to_ascii_uppercase(), expiry)
}

/// Member of [`EXPIRY_SET`] for an underlying and expiry.
#[must_use]
pub fn expiry_member(underlying: &str, expiry: &str) -> String {
    format!("{}:{}", underlying.to_ascii_uppercase(), expiry)
}

/// Expiry listings and strike windows over the option-chain sorted sets.
#[derive(Clone)]
pub struct OptionChainService {
    hydrator: Hydrator,
}

impl OptionChainService {
    /// Creates a service hydrating through `hydrator`.
    #[must_use]
    pub fn new(hydrator: Hydrator) -> Self {
        Self { hydrator }
    }

    /// Expiries listed for `underlying`, in lexicographic order.
    ///
    /// # Errors
    /// Fails if the contract cache is unreachable.
    pub async fn expiries(&self, underlying: &str) -> Result<Vec<String>, SearchError> {
        let prefix = expiry_member(underlying, "");
        let members = self
            .hydrator
            .contracts()
            .query_sorted_set_by_prefix(EXPIRY_SET, &prefix)
            .await?;
        Ok(members
            .into_iter()
            .filter_map(|m| m.strip_prefix(&prefix).map(str::to_string))
            .filter(|expiry| !expiry.is_empty())
            .collect())
    }

    /// Options of one expiry with strikes in `[price - width, price + width]`,
    /// ascending by strike. Callers validate `price` and `width`.
    ///
    /// # Errors
    /// Fails if the cache is unreachable or a listed option cannot be hydrated.
    pub async fn strike_window(
        &self,
        underlying: &str,
        expiry: &str,
        price: f64,
        width: f64,
    ) -> Result<Vec<SearchResultRecord>, SearchError> {
        let keys = self
            .hydrator
            .contracts()
            .range_by_score(&strike_set_key(underlying, expiry), price - width, price + width)
            .await?;
        try_join_all(keys.iter().map(|key| self.hydrator.result_for_key(key))).await
    }
}
