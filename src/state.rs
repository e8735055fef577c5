//! Application state management.

use crate::cache::{
    CacheError, ContractStore, DailyExpiryCache, MemoryContractStore, MemorySearchIndex,
    RedisContractStore, RedisHandle, RedisSearchIndex, ResetSchedule, SearchIndex, SmartCache,
};
use crate::config::{CacheBackend, Config, SearchConfig};
use crate::db::{DatabasePool, MemoryDocuments, PgInstrumentDocuments};
use crate::search::{
    Hydrator, InstrumentDocuments, LegacySearcher, OptionChainService, ScripSearcher,
    WatchlistHydrator,
};
use crate::seed::{self, SeedError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Failures while assembling the state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("cache setup failed: {0}")]
    Cache(#[from] CacheError),
    #[error("database setup failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("seeding failed: {0}")]
    Seed(#[from] SeedError),
    #[error("invalid watchlist schedule: {0}")]
    Schedule(String),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Contract cache, also used for health checks.
    pub contracts: Arc<dyn ContractStore>,
    /// Index-backed search.
    pub searcher: ScripSearcher,
    /// Document-store search.
    pub legacy: LegacySearcher,
    /// Watchlist hydration.
    pub watchlist: WatchlistHydrator,
    /// Option-chain lookups.
    pub option_chain: OptionChainService,
    /// Capacity limits.
    pub search: SearchConfig,
}

impl AppState {
    /// Wires the services over already-built stores.
    ///
    /// # Errors
    /// Returns an error if the watchlist reset schedule is invalid.
    pub fn from_parts(
        contracts: Arc<dyn ContractStore>,
        index: Arc<dyn SearchIndex>,
        documents: Option<Arc<dyn InstrumentDocuments>>,
        config: &Config,
    ) -> Result<Self, StateError> {
        let hydrator = Hydrator::new(Arc::clone(&contracts));
        let schedule = ResetSchedule::new(
            config.watchlist.reset_hour,
            config.watchlist.reset_minute,
            config.watchlist.utc_offset_minutes,
        )
        .map_err(StateError::Schedule)?;

        Ok(Self {
            searcher: ScripSearcher::new(SmartCache::new(index), hydrator.clone()),
            legacy: LegacySearcher::new(
                documents,
                hydrator.clone(),
                config.search.legacy_page_size,
            ),
            watchlist: WatchlistHydrator::new(
                hydrator.clone(),
                Arc::new(DailyExpiryCache::new()),
                schedule,
                config.cache.scan_batch,
            ),
            option_chain: OptionChainService::new(hydrator),
            contracts,
            search: config.search.clone(),
        })
    }

    /// Builds the stores named by the configuration and wires the services.
    ///
    /// # Errors
    /// Returns an error if a store cannot be set up.
    pub async fn from_config(config: &Config) -> Result<Self, StateError> {
        let (contracts, index, mut documents): (
            Arc<dyn ContractStore>,
            Arc<dyn SearchIndex>,
            Option<Arc<dyn InstrumentDocuments>>,
        ) = match config.cache.backend {
            CacheBackend::Redis => {
                let handle = RedisHandle::connect(&config.cache)?;
                info!(index = %config.cache.index_name, "Using redis cache backend");
                (
                    Arc::new(RedisContractStore::new(handle.clone())),
                    Arc::new(RedisSearchIndex::new(handle, config.cache.index_name.clone())),
                    None,
                )
            }
            CacheBackend::Memory => {
                let contracts = MemoryContractStore::new();
                let index = MemorySearchIndex::new();
                let documents = MemoryDocuments::new();
                if let Some(path) = &config.cache.seed_path {
                    let records = seed::load_records(path)?;
                    seed::seed(&records, &contracts, &index, &documents).await?;
                }
                info!(records = index.len(), "Using memory cache backend");
                (
                    Arc::new(contracts),
                    Arc::new(index),
                    Some(Arc::new(documents)),
                )
            }
        };

        if config.database.url.is_some() {
            let db = DatabasePool::connect(&config.database).await?;
            db.run_migrations().await?;
            documents = Some(Arc::new(PgInstrumentDocuments::new(db)));
        }

        Self::from_parts(contracts, index, documents, config)
    }
}
