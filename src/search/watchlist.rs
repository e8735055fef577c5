//! Watchlist hydration: resolves saved stock keys into display records,
//! serving repeats from the daily expiry cache.

use super::SearchError;
use super::hydrate::{Hydrator, decode};
use crate::cache::{HydrationCache, Lookup, ResetSchedule};
use crate::models::SearchResultRecord;
use crate::scrip::derive::{alternate_stock_key, is_cross_exchange, to_result_record};
use crate::scrip::STOCK_KEY_HASH;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Hydrates watchlist keys through a [`HydrationCache`].
#[derive(Clone)]
pub struct WatchlistHydrator {
    hydrator: Hydrator,
    cache: Arc<dyn HydrationCache>,
    schedule: ResetSchedule,
    scan_batch: usize,
}

impl WatchlistHydrator {
    /// Creates a hydrator whose cache entries expire at the next reset of
    /// `schedule`. `scan_batch` sizes the HSCAN pages used by [`Self::warm`].
    #[must_use]
    pub fn new(
        hydrator: Hydrator,
        cache: Arc<dyn HydrationCache>,
        schedule: ResetSchedule,
        scan_batch: usize,
    ) -> Self {
        Self {
            hydrator,
            cache,
            schedule,
            scan_batch,
        }
    }

    /// Number of cached records.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Hydrates `keys` in request order, dropping duplicates.
    ///
    /// Keys with no contract record are skipped.
    ///
    /// # Errors
    /// Fails if the contract cache is unreachable or a record is malformed.
    pub async fn hydrate(
        &self,
        keys: &[String],
        now: DateTime<Utc>,
    ) -> Result<Vec<SearchResultRecord>, SearchError> {
        let mut seen = HashSet::with_capacity(keys.len());
        let unique: Vec<&String> = keys.iter().filter(|k| seen.insert(k.as_str())).collect();

        let resolved = try_join_all(unique.into_iter().map(|key| self.resolve(key, now))).await?;
        Ok(resolved.into_iter().flatten().collect())
    }

    async fn resolve(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchResultRecord>, SearchError> {
        if let Lookup::Fresh(record) = self.cache.get(key, now) {
            return Ok(Some(record));
        }

        match self.hydrator.result_for_key(key).await {
            Ok(record) => {
                self.cache
                    .put(key, record.clone(), self.schedule.next_reset(now));
                Ok(Some(record))
            }
            Err(SearchError::MissingRecord(missing)) => {
                warn!(key = %missing, "Watchlist key has no contract record");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Loads every contract record into the hydration cache.
    ///
    /// Malformed records are skipped. Returns the number of records cached.
    ///
    /// # Errors
    /// Fails if the contract cache cannot be scanned.
    pub async fn warm(&self, now: DateTime<Utc>) -> Result<usize, SearchError> {
        let raw = self
            .hydrator
            .contracts()
            .get_all_from_hash(STOCK_KEY_HASH, self.scan_batch)
            .await?;
        let expiry = self.schedule.next_reset(now);

        let mut warmed = 0;
        for (key, value) in &raw {
            let record = match decode(key, value) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Skipping record during warm-up");
                    continue;
                }
            };
            let alternate = alternate_stock_key(&record)
                .and_then(|alt_key| raw.get(&alt_key).map(|v| (alt_key, v)))
                .and_then(|(alt_key, v)| decode(&alt_key, v).ok())
                .filter(|alt| is_cross_exchange(&record, alt));

            self.cache
                .put(key, to_result_record(&record, alternate.as_ref()), expiry);
            warmed += 1;
        }

        info!(warmed, scanned = raw.len(), "Hydration cache warmed");
        Ok(warmed)
    }
}
