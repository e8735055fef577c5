//! Error types for the cache layer.

use thiserror::Error;

/// Failures talking to the contract cache or the search index.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No connection could be checked out of the pool.
    #[error("redis pool error: {0}")]
    Pool(String),

    /// The server rejected or failed a command.
    #[error("redis command failed: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    /// The call did not complete within its budget.
    #[error("{operation} timed out after {timeout_ms} ms")]
    Timeout {
        /// Command that timed out.
        operation: &'static str,
        /// Budget that was exceeded.
        timeout_ms: u64,
    },

    /// The reply did not have the expected shape.
    #[error("unexpected reply: {0}")]
    Protocol(String),
}
