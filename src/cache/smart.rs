//! Smart cache: full-text search over instrument fields.
//!
//! [`SearchIndex`] runs one typed [`IndexQuery`]. [`SmartCache`] layers the
//! multi-pass search strategy on top of it:
//!
//! | Exchange | Term | Fuzzy | Passes |
//! |----------|------|-------|--------|
//! | given | any | no | prefix on the exchange |
//! | empty | digits | no | strike prefix |
//! | empty | text | no | prefix, then substring to fill the remainder |
//! | given | any | yes | fuzzy on the exchange |
//! | empty | any | yes | fuzzy on NSE, then fuzzy on BSE |

use super::CacheError;
use super::redis::RedisHandle;
use crate::scrip::Exchange;
use async_trait::async_trait;
use deadpool_redis::redis::{self, Value, from_redis_value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Fields matched by prefix and substring queries.
const TEXT_FIELDS: [&str; 4] = ["tradingSymbol", "symbol", "name", "isin"];

/// Fields matched by fuzzy queries.
const FUZZY_FIELDS: [&str; 3] = ["tradingSymbol", "symbol", "name"];

/// Field the index sorts by, descending.
pub const SORT_FIELD: &str = "instIdentifier";

/// Field of each document pointing back to the contract cache.
pub const STOCK_KEY_FIELD: &str = "stockKey";

/// Exchanges searched by an unscoped fuzzy query, in result order.
const FUZZY_FALLBACK_EXCHANGES: [Exchange; 2] = [Exchange::Nse, Exchange::Bse];

/// One query against the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexQuery {
    /// Term as a token prefix of any text field, optionally on one exchange.
    Prefix {
        exchange: Option<Exchange>,
        term: String,
    },
    /// Term anywhere inside any text field.
    Substring { term: String },
    /// Edit-distance match on the symbol and name fields.
    Fuzzy {
        exchange: Option<Exchange>,
        term: String,
    },
    /// Term as a prefix of the strike.
    Strike { term: String },
}

impl IndexQuery {
    /// Renders the query in RediSearch syntax.
    #[must_use]
    pub fn to_redisearch(&self) -> String {
        match self {
            Self::Prefix { exchange, term } => {
                scoped(*exchange, &union(&TEXT_FIELDS, &format!("{}*", term)))
            }
            Self::Substring { term } => union(&TEXT_FIELDS, &format!("*{}*", term)),
            Self::Fuzzy { exchange, term } => scoped(
                *exchange,
                &union(&FUZZY_FIELDS, &format!("%%{}%%", term)),
            ),
            Self::Strike { term } => format!("@strike:{}*", term),
        }
    }
}

impl fmt::Display for IndexQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_redisearch())
    }
}

fn union(fields: &[&str], pattern: &str) -> String {
    fields
        .iter()
        .map(|field| format!("(@{}:{})", field, pattern))
        .collect::<Vec<_>>()
        .join("|")
}

fn scoped(exchange: Option<Exchange>, clause: &str) -> String {
    match exchange {
        Some(ex) => format!("@exchange:{{{}}} ({})", ex.as_str(), clause),
        None => clause.to_string(),
    }
}

/// A full-text index answering typed queries with contract-cache keys.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Runs `query`, skipping `offset` hits and returning at most `limit`
    /// keys ordered by [`SORT_FIELD`] descending.
    async fn execute(
        &self,
        query: &IndexQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, CacheError>;
}

/// Multi-pass search over a [`SearchIndex`].
#[derive(Clone)]
pub struct SmartCache {
    index: Arc<dyn SearchIndex>,
}

impl SmartCache {
    /// Wraps an index.
    #[must_use]
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// Resolves a normalized term into ranked contract-cache keys.
    ///
    /// Keys may repeat across passes; callers deduplicate. The substring fill
    /// asks for `capacity - found` keys and may return prefix hits again, so
    /// a deduplicated page can come back short of `capacity` even when more
    /// matches exist. An exchange outside [`Exchange`] matches nothing.
    ///
    /// # Errors
    /// Returns an error if any pass fails.
    pub async fn perform_new_search(
        &self,
        exchange: Option<&str>,
        term: &str,
        offset: usize,
        capacity: usize,
        fuzzy: bool,
    ) -> Result<Vec<String>, CacheError> {
        if capacity == 0 || term.is_empty() {
            return Ok(Vec::new());
        }

        let exchange = match parse_exchange(exchange) {
            Ok(exchange) => exchange,
            Err(raw) => {
                debug!(exchange = raw, "Unknown exchange, no search issued");
                return Ok(Vec::new());
            }
        };
        let term = term.to_string();

        if fuzzy {
            return match exchange {
                Some(ex) => {
                    let query = IndexQuery::Fuzzy {
                        exchange: Some(ex),
                        term,
                    };
                    self.index.execute(&query, offset, capacity).await
                }
                None => {
                    let mut keys = Vec::new();
                    for ex in FUZZY_FALLBACK_EXCHANGES {
                        let query = IndexQuery::Fuzzy {
                            exchange: Some(ex),
                            term: term.clone(),
                        };
                        keys.extend(self.index.execute(&query, offset, capacity).await?);
                    }
                    Ok(keys)
                }
            };
        }

        if let Some(ex) = exchange {
            let query = IndexQuery::Prefix {
                exchange: Some(ex),
                term,
            };
            return self.index.execute(&query, offset, capacity).await;
        }

        if is_numeric(&term) {
            return self
                .index
                .execute(&IndexQuery::Strike { term }, offset, capacity)
                .await;
        }

        let prefix = IndexQuery::Prefix {
            exchange: None,
            term: term.clone(),
        };
        let mut keys = self.index.execute(&prefix, offset, capacity).await?;
        if keys.len() < capacity {
            let remaining = capacity - keys.len();
            debug!(found = keys.len(), remaining, "Filling with substring matches");
            let substring = IndexQuery::Substring { term };
            keys.extend(self.index.execute(&substring, offset, remaining).await?);
        }
        Ok(keys)
    }
}

/// Whether the term is a bare strike price.
#[must_use]
pub fn is_numeric(term: &str) -> bool {
    !term.is_empty() && term.bytes().all(|b| b.is_ascii_digit())
}

/// Reads an optional exchange filter. Blank means unscoped; anything else must
/// name a known [`Exchange`] and is handed back as the error otherwise.
pub fn parse_exchange(exchange: Option<&str>) -> Result<Option<Exchange>, &str> {
    match exchange.map(str::trim).filter(|ex| !ex.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| raw),
    }
}

/// RediSearch-backed [`SearchIndex`].
#[derive(Clone)]
pub struct RedisSearchIndex {
    redis: RedisHandle,
    index_name: String,
}

impl RedisSearchIndex {
    /// Binds to the named index.
    #[must_use]
    pub fn new(redis: RedisHandle, index_name: impl Into<String>) -> Self {
        Self {
            redis,
            index_name: index_name.into(),
        }
    }
}

#[async_trait]
impl SearchIndex for RedisSearchIndex {
    async fn execute(
        &self,
        query: &IndexQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, CacheError> {
        let rendered = query.to_redisearch();
        let mut cmd = redis::cmd("FT.SEARCH");
        cmd.arg(&self.index_name)
            .arg(&rendered)
            .arg("SORTBY")
            .arg(SORT_FIELD)
            .arg("DESC")
            .arg("LIMIT")
            .arg(offset)
            .arg(limit)
            .arg("RETURN")
            .arg(1)
            .arg(STOCK_KEY_FIELD)
            .arg("DIALECT")
            .arg(2);

        let reply: Vec<Value> = self.redis.query("FT.SEARCH", &cmd).await?;
        let keys = parse_search_reply(&reply)?;
        debug!(query = %rendered, offset, limit, hits = keys.len(), "FT.SEARCH");
        Ok(keys)
    }
}

/// Extracts the stock keys from an `FT.SEARCH ... RETURN 1 stockKey` reply:
/// `[total, id, [field, value, ..], id, [..], ..]`.
pub(crate) fn parse_search_reply(reply: &[Value]) -> Result<Vec<String>, CacheError> {
    let Some((_total, documents)) = reply.split_first() else {
        return Err(CacheError::Protocol("empty FT.SEARCH reply".to_string()));
    };

    let mut keys = Vec::with_capacity(documents.len() / 2);
    for document in documents.chunks(2) {
        let doc_id: String = from_redis_value(&document[0])?;
        let fields: Vec<String> = match document.get(1) {
            Some(value) => from_redis_value(value)?,
            None => Vec::new(),
        };

        let stock_key = fields
            .chunks_exact(2)
            .find(|pair| pair[0] == STOCK_KEY_FIELD)
            .map(|pair| pair[1].clone());
        match stock_key {
            Some(key) => keys.push(key),
            None => warn!(doc_id, "Index document without stockKey"),
        }
    }
    Ok(keys)
}
