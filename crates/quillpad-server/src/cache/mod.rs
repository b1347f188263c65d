//! Caching layer: KV backends plus the cache-aside read-through store.

pub mod backend;
pub mod store;

pub use backend::{CacheError, KvCache, MemoryCache, NoOpCache, RedisCache, create_cache_backend};
pub use store::{
    CacheKey, CacheStats, InvalidationTags, NOTE_LIST_PREFIX, ReadThroughCache,
    discard_cache_error,
};
