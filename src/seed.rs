//! Seeding of the in-process backends from a JSON file of instrument records.

use crate::cache::{CacheError, ContractStore, MemorySearchIndex};
use crate::db::MemoryDocuments;
use crate::scrip::{ISIN_HASH, InstrumentRecord, STOCK_KEY_HASH, SearchIndexEntry};
use crate::search::option_chain::{EXPIRY_SET, expiry_member, strike_set_key};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Seeding failures.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to store seed record: {0}")]
    Cache(#[from] CacheError),
}

/// Reads a JSON array of records.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a record array.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<InstrumentRecord>, SeedError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes `records` into the contract store, the search index and the
/// document store. Options with an expiry and a strike are also listed in the
/// option-chain sets.
///
/// # Errors
/// Returns an error if the contract store rejects a write.
pub async fn seed(
    records: &[InstrumentRecord],
    contracts: &dyn ContractStore,
    index: &MemorySearchIndex,
    documents: &MemoryDocuments,
) -> Result<usize, SeedError> {
    let mut chain_members = 0;

    for record in records {
        let json = serde_json::to_string(record)?;
        contracts
            .set_in_hash(STOCK_KEY_HASH, &record.stock_key(), &json)
            .await?;
        if let Some(isin_key) = record.isin_key() {
            contracts.set_in_hash(ISIN_HASH, &isin_key, &json).await?;
        }

        if is_listed_option(record) {
            contracts
                .add_to_sorted_set(EXPIRY_SET, 0.0, &expiry_member(&record.symbol, &record.expiry))
                .await?;
            contracts
                .add_to_sorted_set(
                    &strike_set_key(&record.symbol, &record.expiry),
                    record.strike,
                    &record.stock_key(),
                )
                .await?;
            chain_members += 1;
        }

        index.upsert(SearchIndexEntry::from(record));
        documents.insert(record.clone());
    }

    info!(
        records = records.len(),
        chain_members, "Seeded in-memory backends"
    );
    Ok(records.len())
}

fn is_listed_option(record: &InstrumentRecord) -> bool {
    !record.symbol.is_empty() && !record.expiry.is_empty() && record.strike > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryContractStore;

    const SEED: &str = r#"[
        {"token": "2885", "exchange": "NSE", "symbol": "RELIANCE", "tradingSymbol": "RELIANCE",
         "name": "Reliance Industries", "isin": "INE002A01018", "series": "EQ",
         "alternateToken": "500325", "instIdentifier": 20},
        {"token": "43210", "exchange": "NFO", "symbol": "NIFTY",
         "tradingSymbol": "NIFTY24APR22000CE", "name": "NIFTY", "expiry": "2024-04-25",
         "strike": 22000.0}
    ]"#;

    #[tokio::test]
    async fn test_seed_populates_every_store() {
        let records: Vec<InstrumentRecord> = serde_json::from_str(SEED).unwrap();
        let contracts = MemoryContractStore::new();
        let index = MemorySearchIndex::new();
        let documents = MemoryDocuments::new();

        let seeded = seed(&records, &contracts, &index, &documents).await.unwrap();

        assert_eq!(seeded, 2);
        assert_eq!(contracts.hash_len(STOCK_KEY_HASH), 2);
        assert_eq!(contracts.hash_len(ISIN_HASH), 1);
        assert!(
            contracts
                .get_from_hash(ISIN_HASH, "NSE-INE002A01018")
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(index.len(), 2);
        assert_eq!(documents.len(), 2);

        let expiries = contracts
            .query_sorted_set_by_prefix(EXPIRY_SET, "NIFTY:")
            .await
            .unwrap();
        assert_eq!(expiries, vec!["NIFTY:2024-04-25"]);
        let strikes = contracts
            .range_by_score(&strike_set_key("NIFTY", "2024-04-25"), 22000.0, 22000.0)
            .await
            .unwrap();
        assert_eq!(strikes, vec!["NFO_43210"]);
    }

    #[test]
    fn test_load_records_missing_file() {
        let result = load_records("/nonexistent/seed.json");
        assert!(matches!(result, Err(SeedError::Read(_))));
    }
}
