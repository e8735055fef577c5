//! In-process instrument document store.

use crate::scrip::{Exchange, InstrumentRecord};
use crate::search::{InstrumentDocuments, SearchError, words};
use async_trait::async_trait;
use parking_lot::RwLock;

/// [`InstrumentDocuments`] over a record list.
///
/// A record matches when every term is a prefix of some word in its trading
/// symbol, symbol, name or ISIN, the way a `simple` prefix tsquery matches.
#[derive(Debug, Default)]
pub struct MemoryDocuments {
    records: RwLock<Vec<InstrumentRecord>>,
}

impl MemoryDocuments {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, replacing one with the same stock key.
    pub fn insert(&self, record: InstrumentRecord) {
        let mut records = self.records.write();
        let key = record.stock_key();
        match records.iter_mut().find(|r| r.stock_key() == key) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl InstrumentDocuments for MemoryDocuments {
    async fn full_text_search(
        &self,
        terms: &[String],
        exchange: Option<Exchange>,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<InstrumentRecord>, SearchError> {
        let Some(skip) = (page.max(1) - 1).checked_mul(page_size) else {
            return Ok(Vec::new());
        };

        let records = self.records.read();
        let mut hits: Vec<&InstrumentRecord> = records
            .iter()
            .filter(|r| exchange.is_none_or(|ex| r.exchange.eq_ignore_ascii_case(ex.as_str())))
            .filter(|r| matches_terms(r, terms))
            .collect();
        hits.sort_by(|a, b| b.inst_identifier.cmp(&a.inst_identifier));

        Ok(hits
            .into_iter()
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect())
    }
}

fn matches_terms(record: &InstrumentRecord, terms: &[String]) -> bool {
    let record_words: Vec<String> =
        [&record.trading_symbol, &record.symbol, &record.name, &record.isin]
            .into_iter()
            .flat_map(|field| words(field))
            .collect();
    terms
        .iter()
        .all(|term| record_words.iter().any(|word| word.starts_with(term.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(exchange: &str, token: &str, name: &str, rank: i64) -> InstrumentRecord {
        InstrumentRecord {
            token: token.to_string(),
            exchange: exchange.to_string(),
            symbol: name.to_ascii_uppercase(),
            trading_symbol: name.to_ascii_uppercase(),
            name: name.to_string(),
            inst_identifier: rank,
            ..Default::default()
        }
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_full_text_search_pages() {
        let docs = MemoryDocuments::new();
        docs.insert(record("NSE", "1", "Bank One", 1));
        docs.insert(record("NSE", "2", "Bank Two", 3));
        docs.insert(record("BSE", "3", "Bank Three", 2));
        let bank = terms(&["bank"]);

        let first = docs.full_text_search(&bank, None, 1, 2).await.unwrap();
        let tokens: Vec<_> = first.iter().map(|r| r.token.as_str()).collect();
        assert_eq!(tokens, vec!["2", "3"]);

        let second = docs.full_text_search(&bank, None, 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].token, "1");

        let zero = docs.full_text_search(&bank, None, 0, 2).await.unwrap();
        assert_eq!(zero, first);
    }

    #[tokio::test]
    async fn test_full_text_search_huge_page_is_empty() {
        let docs = MemoryDocuments::new();
        docs.insert(record("NSE", "1", "Bank One", 1));

        let hits = docs
            .full_text_search(&terms(&["bank"]), None, usize::MAX, 20)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_full_text_search_matches_word_prefixes() {
        let docs = MemoryDocuments::new();
        docs.insert(record("NSE", "1", "Reliance Industries", 2));
        docs.insert(record("NSE", "2", "Reliance Power", 1));

        let hits = docs
            .full_text_search(&terms(&["reli", "ind"]), None, 1, 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].token, "1");

        let inner = docs
            .full_text_search(&terms(&["liance"]), None, 1, 10)
            .await
            .unwrap();
        assert!(inner.is_empty());

        let squashed = docs
            .full_text_search(&terms(&["relianceindustries"]), None, 1, 10)
            .await
            .unwrap();
        assert!(squashed.is_empty());
    }

    #[tokio::test]
    async fn test_full_text_search_exchange_filter() {
        let docs = MemoryDocuments::new();
        docs.insert(record("NSE", "1", "Mahindra & Mahindra", 1));
        docs.insert(record("BSE", "2", "Mahindra & Mahindra", 1));

        let hits = docs
            .full_text_search(&terms(&["m", "m"]), Some(Exchange::Bse), 1, 10)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].exchange, "BSE");
        assert_eq!(docs.len(), 2);
    }
}
