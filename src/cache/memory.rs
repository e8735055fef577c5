//! In-process contract store and search index.
//!
//! Used by the `memory` cache backend and by tests. Semantics mirror the Redis
//! implementations closely enough for the search strategy to behave the same.

use super::CacheError;
use super::contract::ContractStore;
use super::smart::{IndexQuery, SearchIndex};
use crate::scrip::{Exchange, SearchIndexEntry};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Maximum edit distance accepted by fuzzy queries.
const FUZZY_MAX_DISTANCE: usize = 2;

/// [`ContractStore`] over in-process maps.
#[derive(Debug, Default)]
pub struct MemoryContractStore {
    hashes: RwLock<HashMap<String, HashMap<String, String>>>,
    sorted_sets: RwLock<HashMap<String, Vec<(f64, String)>>>,
}

impl MemoryContractStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in `hash`.
    #[must_use]
    pub fn hash_len(&self, hash: &str) -> usize {
        self.hashes.read().get(hash).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl ContractStore for MemoryContractStore {
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn get_from_hash(&self, hash: &str, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self
            .hashes
            .read()
            .get(hash)
            .and_then(|entries| entries.get(key).cloned()))
    }

    async fn get_all_from_hash(
        &self,
        hash: &str,
        _batch_size: usize,
    ) -> Result<HashMap<String, String>, CacheError> {
        Ok(self.hashes.read().get(hash).cloned().unwrap_or_default())
    }

    async fn set_in_hash(&self, hash: &str, key: &str, value: &str) -> Result<(), CacheError> {
        self.hashes
            .write()
            .entry(hash.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn add_to_sorted_set(
        &self,
        key: &str,
        score: f64,
        member: &str,
    ) -> Result<(), CacheError> {
        let mut sets = self.sorted_sets.write();
        let set = sets.entry(key.to_string()).or_default();
        set.retain(|(_, existing)| existing != member);
        set.push((score, member.to_string()));
        set.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        Ok(())
    }

    async fn query_sorted_set_by_prefix(
        &self,
        key: &str,
        prefix: &str,
    ) -> Result<Vec<String>, CacheError> {
        let sets = self.sorted_sets.read();
        let mut members: Vec<String> = sets
            .get(key)
            .into_iter()
            .flatten()
            .filter(|(_, member)| member.starts_with(prefix))
            .map(|(_, member)| member.clone())
            .collect();
        members.sort();
        Ok(members)
    }

    async fn range_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<String>, CacheError> {
        Ok(self
            .sorted_sets
            .read()
            .get(key)
            .into_iter()
            .flatten()
            .filter(|(score, _)| *score >= min && *score <= max)
            .map(|(_, member)| member.clone())
            .collect())
    }
}

/// [`SearchIndex`] over an in-process entry list.
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    entries: RwLock<Vec<SearchIndexEntry>>,
}

impl MemorySearchIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any entry with the same stock key.
    pub fn upsert(&self, entry: SearchIndexEntry) {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|e| e.stock_key == entry.stock_key) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn execute(
        &self,
        query: &IndexQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.read();
        let mut hits: Vec<&SearchIndexEntry> =
            entries.iter().filter(|entry| matches(query, entry)).collect();
        hits.sort_by(|a, b| b.inst_identifier.cmp(&a.inst_identifier));

        Ok(hits
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|entry| entry.stock_key.clone())
            .collect())
    }
}

fn matches(query: &IndexQuery, entry: &SearchIndexEntry) -> bool {
    match query {
        IndexQuery::Prefix { exchange, term } => {
            on_exchange(*exchange, entry)
                && text_fields(entry)
                    .iter()
                    .any(|field| tokens(field).any(|token| token.starts_with(&lower(term))))
        }
        IndexQuery::Substring { term } => text_fields(entry)
            .iter()
            .any(|field| field.to_lowercase().contains(&lower(term))),
        IndexQuery::Fuzzy { exchange, term } => {
            let term = lower(term);
            on_exchange(*exchange, entry)
                && [&entry.trading_symbol, &entry.symbol, &entry.name]
                    .iter()
                    .any(|field| {
                        tokens(field).any(|token| levenshtein(&token, &term) <= FUZZY_MAX_DISTANCE)
                    })
        }
        IndexQuery::Strike { term } => !entry.strike.is_empty() && entry.strike.starts_with(term),
    }
}

fn on_exchange(exchange: Option<Exchange>, entry: &SearchIndexEntry) -> bool {
    exchange.is_none_or(|ex| entry.exchange.eq_ignore_ascii_case(ex.as_str()))
}

fn text_fields(entry: &SearchIndexEntry) -> [&String; 4] {
    [&entry.trading_symbol, &entry.symbol, &entry.name, &entry.isin]
}

fn lower(s: &str) -> String {
    s.to_lowercase()
}

/// Lowercased tokens split on anything that is not alphanumeric.
fn tokens(field: &str) -> impl Iterator<Item = String> + '_ {
    field
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
