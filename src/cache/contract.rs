//! Contract cache: instrument records in hashes, option-chain members in
//! sorted sets.

use super::CacheError;
use super::redis::RedisHandle;
use async_trait::async_trait;
use deadpool_redis::redis;
use std::collections::HashMap;
use tracing::debug;

/// Key/value access to the contract cache.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Liveness check.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Single lookup. `Ok(None)` means the key is absent from the hash.
    async fn get_from_hash(&self, hash: &str, key: &str) -> Result<Option<String>, CacheError>;

    /// Every entry of `hash`, read incrementally `batch_size` entries at a time.
    async fn get_all_from_hash(
        &self,
        hash: &str,
        batch_size: usize,
    ) -> Result<HashMap<String, String>, CacheError>;

    /// Upserts one hash entry.
    async fn set_in_hash(&self, hash: &str, key: &str, value: &str) -> Result<(), CacheError>;

    /// Adds or rescores a sorted-set member.
    async fn add_to_sorted_set(&self, key: &str, score: f64, member: &str)
    -> Result<(), CacheError>;

    /// Members starting with `prefix`, in lexical order. Only meaningful for
    /// sets whose members share one score.
    async fn query_sorted_set_by_prefix(
        &self,
        key: &str,
        prefix: &str,
    ) -> Result<Vec<String>, CacheError>;

    /// Members with `min <= score <= max`, in score order.
    async fn range_by_score(&self, key: &str, min: f64, max: f64)
    -> Result<Vec<String>, CacheError>;
}

/// Redis-backed [`ContractStore`].
#[derive(Clone)]
pub struct RedisContractStore {
    redis: RedisHandle,
}

impl RedisContractStore {
    /// Wraps a shared Redis handle.
    #[must_use]
    pub fn new(redis: RedisHandle) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ContractStore for RedisContractStore {
    async fn ping(&self) -> Result<(), CacheError> {
        self.redis.ping().await
    }

    async fn get_from_hash(&self, hash: &str, key: &str) -> Result<Option<String>, CacheError> {
        let mut cmd = redis::cmd("HGET");
        cmd.arg(hash).arg(key);
        self.redis.query("HGET", &cmd).await
    }

    async fn get_all_from_hash(
        &self,
        hash: &str,
        batch_size: usize,
    ) -> Result<HashMap<String, String>, CacheError> {
        let mut entries = HashMap::new();
        let mut cursor: u64 = 0;
        let mut pages = 0usize;

        loop {
            let mut cmd = redis::cmd("HSCAN");
            cmd.arg(hash).arg(cursor).arg("COUNT").arg(batch_size);
            let (next, flat): (u64, Vec<String>) = self.redis.query("HSCAN", &cmd).await?;

            if flat.len() % 2 != 0 {
                return Err(CacheError::Protocol(format!(
                    "HSCAN on {} returned an odd number of items",
                    hash
                )));
            }
            for pair in flat.chunks_exact(2) {
                entries.insert(pair[0].clone(), pair[1].clone());
            }

            pages += 1;
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(hash, pages, entries = entries.len(), "Scanned hash");
        Ok(entries)
    }

    async fn set_in_hash(&self, hash: &str, key: &str, value: &str) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(hash).arg(key).arg(value);
        self.redis.query("HSET", &cmd).await
    }

    async fn add_to_sorted_set(
        &self,
        key: &str,
        score: f64,
        member: &str,
    ) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("ZADD");
        cmd.arg(key).arg(score).arg(member);
        self.redis.query("ZADD", &cmd).await
    }

    async fn query_sorted_set_by_prefix(
        &self,
        key: &str,
        prefix: &str,
    ) -> Result<Vec<String>, CacheError> {
        let (min, max) = lex_bounds(prefix);
        let mut cmd = redis::cmd("ZRANGEBYLEX");
        cmd.arg(key).arg(min).arg(max);
        self.redis.query("ZRANGEBYLEX", &cmd).await
    }

    async fn range_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<String>, CacheError> {
        let mut cmd = redis::cmd("ZRANGEBYSCORE");
        cmd.arg(key).arg(min).arg(max);
        self.redis.query("ZRANGEBYSCORE", &cmd).await
    }
}

/// Inclusive ZRANGEBYLEX bounds covering every member starting with `prefix`.
fn lex_bounds(prefix: &str) -> (Vec<u8>, Vec<u8>) {
    let mut min = Vec::with_capacity(prefix.len() + 1);
    min.push(b'[');
    min.extend_from_slice(prefix.as_bytes());

    let mut max = min.clone();
    max.push(0xff);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_bounds() {
        let (min, max) = lex_bounds("NIFTY:");
        assert_eq!(min, b"[NIFTY:".to_vec());
        assert_eq!(max.len(), min.len() + 1);
        assert_eq!(max.last(), Some(&0xff));
        assert!(max.starts_with(&min));
    }

    #[test]
    fn test_lex_bounds_empty_prefix() {
        let (min, max) = lex_bounds("");
        assert_eq!(min, b"[".to_vec());
        assert_eq!(max, vec![b'[', 0xff]);
    }
}
