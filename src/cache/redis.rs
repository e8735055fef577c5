//! Pooled Redis connection shared by the contract cache and the search index.

use super::CacheError;
use crate::config::CacheConfig;
use deadpool_redis::redis::{Cmd, FromRedisValue};
use deadpool_redis::{Config as RedisConfig, Pool, PoolConfig, Runtime};
use std::future::Future;
use std::time::Duration;
use tracing::info;

/// Redis pool with per-call time budgets.
#[derive(Clone)]
pub struct RedisHandle {
    pool: Pool,
    op_timeout: Duration,
    ping_timeout: Duration,
}

impl RedisHandle {
    /// Builds the pool. Connections are opened lazily on first use.
    ///
    /// # Errors
    /// Returns an error if the URL is missing or the pool cannot be created.
    pub fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| CacheError::Pool("no redis url configured".to_string()))?;

        let mut redis_config = RedisConfig::from_url(url);
        redis_config.pool = Some(PoolConfig::new(config.pool_size));
        let pool = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Pool(e.to_string()))?;

        info!(pool_size = config.pool_size, "Redis pool created");

        Ok(Self {
            pool,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
            ping_timeout: Duration::from_millis(config.ping_timeout_ms),
        })
    }

    /// Liveness check bounded by the ping budget.
    ///
    /// # Errors
    /// Returns an error if the server does not answer in time.
    pub async fn ping(&self) -> Result<(), CacheError> {
        let cmd = deadpool_redis::redis::cmd("PING");
        let _pong: String = self.run("PING", self.ping_timeout, &cmd).await?;
        Ok(())
    }

    /// Runs one command bounded by the data-operation budget.
    ///
    /// # Errors
    /// Returns an error on pool, command or timeout failure.
    pub async fn query<T>(&self, operation: &'static str, cmd: &Cmd) -> Result<T, CacheError>
    where
        T: FromRedisValue + Send,
    {
        self.run(operation, self.op_timeout, cmd).await
    }

    async fn run<T>(
        &self,
        operation: &'static str,
        limit: Duration,
        cmd: &Cmd,
    ) -> Result<T, CacheError>
    where
        T: FromRedisValue + Send,
    {
        bounded(operation, limit, async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|e| CacheError::Pool(e.to_string()))?;
            let value: T = cmd.query_async(&mut conn).await?;
            Ok(value)
        })
        .await
    }
}

/// Fails with [`CacheError::Timeout`] when `fut` outlives `limit`.
pub(crate) async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| CacheError::Timeout {
            operation,
            timeout_ms: limit.as_millis() as u64,
        })?
}
