//! Cache/History Store: TTL key/value cache plus capped per-user history.
//!
//! Cache failures never reach callers: `Cache` logs them and reports a miss.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::warn;

pub mod history;
pub mod memory;
pub mod redis_cache;

pub use history::HistoryStore;
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache backend unavailable: {0}")]
    Backend(String),
}

/// A string key/value store with per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;
}

/// JSON view over a `CacheStore`. Cloned freely; the backend is shared.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns `None` on a miss, a backend failure, or an undecodable value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for '{key}', treating as miss: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Cached value for '{key}' is not valid JSON, ignoring: {e}");
                None
            }
        }
    }

    /// Stores `value` for `ttl_secs` (at least one second). Failures are logged only.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not serialize value for cache key '{key}': {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &raw, ttl_secs.max(1)).await {
            warn!("Cache write failed for '{key}': {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Backend("connection refused".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), CacheError> {
            Err(CacheError::Backend("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_backend_failure_reads_as_miss() {
        let cache = Cache::new(Arc::new(BrokenStore));
        cache.set_json("k", &vec![1, 2, 3], 60).await;
        let value: Option<Vec<i32>> = cache.get_json("k").await;
        assert!(value.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get_round_trips_until_ttl() {
        let cache = Cache::new(Arc::new(MemoryCache::new()));
        cache.set_json("search:abc", &vec!["p1", "p2"], 30).await;

        let hit: Option<Vec<String>> = cache.get_json("search:abc").await;
        assert_eq!(hit, Some(vec!["p1".to_string(), "p2".to_string()]));

        tokio::time::advance(Duration::from_secs(31)).await;
        let miss: Option<Vec<String>> = cache.get_json("search:abc").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_wrong_shape_reads_as_miss() {
        let store = Arc::new(MemoryCache::new());
        store.set("k", "not json", 60).await.unwrap();
        let cache = Cache::new(store);
        let value: Option<Vec<u32>> = cache.get_json("k").await;
        assert!(value.is_none());
    }
}
