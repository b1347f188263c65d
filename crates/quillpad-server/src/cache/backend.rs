//! KV cache backends.
//!
//! [`KvCache`] is the narrow contract the cache-aside layer needs: get, set
//! with TTL, delete, and prefix delete. Three implementations:
//!
//! - [`MemoryCache`]: in-process DashMap with TTL-checked entries.
//! - [`RedisCache`]: shared cache over a deadpool pool. Every operation runs
//!   under a short timeout and is retried at most once, so a Redis outage
//!   costs a bounded delay, never a hung request.
//! - [`NoOpCache`]: caching disabled; every read is a miss.
//!
//! Backends report failures as [`CacheError`]; the policy of what to do with
//! one lives a level up, in the read-through store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;

use crate::config::RedisConfig;

/// Errors from a cache backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend reported a failure.
    #[error("cache backend error: {message}")]
    Backend { message: String },

    /// The operation did not complete within the configured timeout.
    #[error("cache operation timed out")]
    Timeout,
}

impl CacheError {
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// The KV primitives the cache-aside layer is built on.
#[async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Deletes every key starting with `prefix`.
    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

// =============================================================================
// In-process backend
// =============================================================================

#[derive(Clone, Debug)]
struct MemoryEntry {
    data: Vec<u8>,
    cached_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

/// Single-instance cache backed by a concurrent map.
///
/// Expired entries are dropped lazily on the next read of their key.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (possibly expired, not yet reaped) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.data.clone()));
            }
            drop(entry);
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                data: value,
                cached_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.entries.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

// =============================================================================
// Redis backend
// =============================================================================

/// Shared cache over Redis.
pub struct RedisCache {
    pool: Pool,
    op_timeout: Duration,
}

impl RedisCache {
    #[must_use]
    pub fn new(pool: Pool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Runs an operation under the configured timeout, retrying once on
    /// failure or timeout. Connection churn and transient errors recover on
    /// the retry; anything persistent surfaces after the second attempt.
    async fn run<T, Fut>(&self, op_name: &str, mut op: impl FnMut() -> Fut) -> Result<T, CacheError>
    where
        Fut: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.op_timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                tracing::debug!(op = %op_name, error = %e, "redis operation failed, retrying once");
            }
            Err(_) => {
                tracing::debug!(op = %op_name, "redis operation timed out, retrying once");
            }
        }
        match tokio::time::timeout(self.op_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout),
        }
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        conn.get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn store(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;

        let pattern = format!("{prefix}*");
        let keys: Vec<String> = {
            let mut iter = conn
                .scan_match::<_, String>(&pattern)
                .await
                .map_err(|e| CacheError::backend(e.to_string()))?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };

        if keys.is_empty() {
            return Ok(());
        }
        conn.del::<_, ()>(keys)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }
}

#[async_trait]
impl KvCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.run("GET", || self.fetch(key)).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.run("SETEX", || self.store(key, &value, ttl)).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.run("DEL", || self.remove(key)).await
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.run("SCAN+DEL", || self.remove_prefix(prefix)).await
    }
}

// =============================================================================
// Disabled backend
// =============================================================================

/// Backend for deployments that run without a cache: every read misses and
/// every write succeeds without storing anything.
pub struct NoOpCache;

#[async_trait]
impl KvCache for NoOpCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_prefix(&self, _prefix: &str) -> Result<(), CacheError> {
        Ok(())
    }
}

// =============================================================================
// Backend construction
// =============================================================================

/// Builds the cache backend from configuration.
///
/// Redis misconfiguration degrades to the in-process cache with a warning
/// rather than failing startup: the cache is an optimization, and losing it
/// must not take the service down.
pub fn create_cache_backend(cfg: &RedisConfig) -> Arc<dyn KvCache> {
    if !cfg.enabled {
        tracing::info!("cache backend: in-process");
        return Arc::new(MemoryCache::new());
    }

    let pool = deadpool_redis::Config::from_url(&cfg.url)
        .builder()
        .map_err(deadpool_redis::CreatePoolError::Config)
        .and_then(|b| {
            b.max_size(cfg.pool_size)
                .runtime(deadpool_redis::Runtime::Tokio1)
                .build()
                .map_err(deadpool_redis::CreatePoolError::Build)
        });

    match pool {
        Ok(pool) => {
            tracing::info!(url = %cfg.url, pool_size = cfg.pool_size, "cache backend: redis");
            Arc::new(RedisCache::new(pool, cfg.op_timeout()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "redis pool creation failed, falling back to in-process cache");
            Arc::new(MemoryCache::new())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
