//! The cache-aside read-through store.
//!
//! Reads go through [`ReadThroughCache::read`]: check the cache, fall back to
//! the primary store on a miss, then populate the cache best-effort. Writes go
//! to the primary store directly; the handler then calls
//! [`ReadThroughCache::invalidate`] with the keys and prefixes the write
//! affects, before its success response is returned. Entries are MessagePack.
//!
//! ## Cache Key Format
//!
//! - `notes:item:{id}` for single notes
//! - `notes:list:p{page}:n{per_page}` for list pages
//!
//! ## Failure Policy
//!
//! The cache is never load-bearing for correctness. Every backend error is
//! routed through [`discard_cache_error`], which logs it and drops it: a
//! failed read falls through to the primary store, a failed write or
//! invalidation leaves at most a TTL-bounded window of staleness.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use quillpad_storage::{Page, StorageError};

use super::backend::{CacheError, KvCache};

// =============================================================================
// Keys and invalidation tags
// =============================================================================

/// Prefix shared by every cached note list page.
pub const NOTE_LIST_PREFIX: &str = "notes:list:";

/// A deterministic, namespaced cache key.
///
/// The same logical query always produces the same key, and distinct queries
/// never collide: the page number and size are both part of the list key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a single note.
    #[must_use]
    pub fn note_item(id: Uuid) -> Self {
        Self(format!("notes:item:{id}"))
    }

    /// Key for one page of the note list.
    #[must_use]
    pub fn note_list(page: Page) -> Self {
        Self(format!("{NOTE_LIST_PREFIX}p{}:n{}", page.number, page.size))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The cache entries a write invalidates: exact keys plus key prefixes.
#[derive(Debug, Clone, Default)]
pub struct InvalidationTags {
    keys: Vec<CacheKey>,
    prefixes: Vec<&'static str>,
}

impl InvalidationTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(mut self, key: CacheKey) -> Self {
        self.keys.push(key);
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefixes.push(prefix);
        self
    }

    /// Tags for any write touching the note with `id`: the item entry plus
    /// every cached list page, since ordering and totals may have changed.
    #[must_use]
    pub fn note_write(id: Uuid) -> Self {
        Self::new()
            .key(CacheKey::note_item(id))
            .prefix(NOTE_LIST_PREFIX)
    }
}

// =============================================================================
// Failure policy
// =============================================================================

/// The single place cache errors go to die.
///
/// Logs the failure and discards it, keeping the primary store authoritative.
/// Named so the fail-open behavior is visible at every call site.
pub fn discard_cache_error(op: &str, key: &str, err: &CacheError) {
    tracing::warn!(op = %op, key = %key, error = %err, "cache unavailable, continuing without it");
}

// =============================================================================
// Read-through store
// =============================================================================

/// Hit/miss counters for the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in `[0.0, 1.0]`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// Cache-aside wrapper over a [`KvCache`] backend.
pub struct ReadThroughCache {
    backend: Arc<dyn KvCache>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReadThroughCache {
    #[must_use]
    pub fn new(backend: Arc<dyn KvCache>) -> Self {
        Self {
            backend,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Reads `key` through the cache.
    ///
    /// On a hit, deserializes and returns the cached value. On a miss, a
    /// backend error, or an undeserializable entry, runs `loader` against the
    /// primary store, then caches the result best-effort under `ttl`.
    ///
    /// # Errors
    /// Only loader (primary store) errors propagate. Cache errors never do.
    pub async fn read<T, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        loader: F,
    ) -> Result<T, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        match self.backend.get(key.as_str()).await {
            Ok(Some(bytes)) => match rmp_serde::from_slice::<T>(&bytes) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    // Entry from an incompatible version, or corrupted.
                    // Drop it and treat as a miss.
                    tracing::warn!(key = %key, error = %e, "discarding undeserializable cache entry");
                    if let Err(e) = self.backend.delete(key.as_str()).await {
                        discard_cache_error("delete", key.as_str(), &e);
                    }
                }
            },
            Ok(None) => {}
            Err(e) => discard_cache_error("get", key.as_str(), &e),
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "cache miss");
        let value = loader().await?;

        match rmp_serde::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.backend.set(key.as_str(), bytes, ttl).await {
                    discard_cache_error("set", key.as_str(), &e);
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to serialize value for cache");
            }
        }

        Ok(value)
    }

    /// Deletes every entry the tags name.
    ///
    /// Called after the primary-store write commits and before the success
    /// response is returned, so a subsequent read repopulates from the
    /// now-current primary store. Failures are logged and discarded; the
    /// residual staleness window is bounded by the entry TTL.
    pub async fn invalidate(&self, tags: &InvalidationTags) {
        for key in &tags.keys {
            if let Err(e) = self.backend.delete(key.as_str()).await {
                discard_cache_error("delete", key.as_str(), &e);
            }
        }
        for prefix in &tags.prefixes {
            if let Err(e) = self.backend.delete_prefix(prefix).await {
                discard_cache_error("delete_prefix", prefix, &e);
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
