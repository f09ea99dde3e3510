//! Shared Cache Handle
//!
//! Thread-safe wrapper around [`PriorityExpiryCache`] for concurrent callers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{current_timestamp_ms, CacheStats, PriorityExpiryCache, Timestamp};
use crate::config::Config;

/// Cloneable handle to one cache instance.
///
/// Every call holds a single exclusive lock for its whole duration, covering
/// the lookup, the structural update and the eviction loop. None of them
/// wait on anything else while holding it.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<Mutex<PriorityExpiryCache<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    /// Wraps an existing cache.
    pub fn new(cache: PriorityExpiryCache<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn with_max_items(max_items: i64) -> Self {
        Self::new(PriorityExpiryCache::new(max_items))
    }

    /// Creates a cache sized from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_max_items(config.max_items)
    }

    /// Looks up `key` at the current wall-clock time.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms()).await
    }

    pub async fn get_at(&self, key: &str, now: Timestamp) -> Option<V> {
        let mut cache = self.inner.lock().await;
        cache.get(key, now).cloned()
    }

    /// Stores `value` until `expire_at` (Unix milliseconds).
    pub async fn set(&self, key: impl Into<String>, value: V, priority: i64, expire_at: Timestamp) {
        self.set_at(key, value, priority, expire_at, current_timestamp_ms())
            .await
    }

    pub async fn set_at(
        &self,
        key: impl Into<String>,
        value: V,
        priority: i64,
        expire_at: Timestamp,
        now: Timestamp,
    ) {
        let mut cache = self.inner.lock().await;
        cache.set(key, value, priority, expire_at, now);
    }

    /// Changes capacity and trims the cache immediately.
    pub async fn set_max_items(&self, max_items: i64) {
        self.set_max_items_at(max_items, current_timestamp_ms())
            .await
    }

    pub async fn set_max_items_at(&self, max_items: i64, now: Timestamp) {
        let mut cache = self.inner.lock().await;
        cache.set_max_items(max_items, now);
    }

    pub async fn remove(&self, key: &str) -> Option<V> {
        let mut cache = self.inner.lock().await;
        cache.remove(key)
    }

    /// Drops every entry already expired by the wall clock.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(current_timestamp_ms()).await
    }

    pub async fn purge_expired_at(&self, now: Timestamp) -> usize {
        let mut cache = self.inner.lock().await;
        cache.purge_expired(now)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.lock().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_set_and_get() {
        let cache = SharedCache::with_max_items(10);

        cache.set_at("key", "value".to_string(), 1, 100, 0).await;

        assert_eq!(cache.get_at("key", 50).await, Some("value".to_string()));
        assert_eq!(cache.get_at("key", 100).await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_shared_wall_clock_variants() {
        let cache = SharedCache::with_max_items(10);
        let in_a_minute = current_timestamp_ms() + 60_000;

        cache.set("fresh", 1u32, 1, in_a_minute).await;
        cache.set("stale", 2u32, 1, 0).await;

        assert_eq!(cache.get("fresh").await, Some(1));
        assert_eq!(cache.get("stale").await, None);
    }

    #[tokio::test]
    async fn test_shared_resize_evicts() {
        let cache = SharedCache::with_max_items(3);
        for key in ["a", "b", "c"] {
            cache.set_at(key, 0u8, 1, 1_000, 0).await;
        }

        cache.set_max_items_at(1, 0).await;

        assert_eq!(cache.keys().await, vec!["c".to_string()]);
        assert_eq!(cache.stats().await.evictions, 2);
    }

    #[tokio::test]
    async fn test_shared_clones_share_state() {
        let cache = SharedCache::with_max_items(10);
        let other = cache.clone();

        other.set_at("k", 7i32, 0, 1_000, 0).await;
        assert_eq!(cache.remove("k").await, Some(7));
        assert_eq!(other.len().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_concurrent_writers_respect_capacity() {
        let cache = SharedCache::with_max_items(8);

        let tasks: Vec<_> = (0..16)
            .map(|worker| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    for i in 0..50 {
                        let key = format!("w{}-{}", worker, i % 10);
                        cache.set_at(key.clone(), i, worker % 3, 10_000, 0).await;
                        let _ = cache.get_at(&key, 0).await;
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cache.len().await, 8);
        assert_eq!(cache.stats().await.total_entries, 8);
    }

    #[tokio::test]
    async fn test_shared_from_config() {
        let config = Config {
            max_items: 2,
            ..Config::default()
        };
        let cache: SharedCache<String> = SharedCache::from_config(&config);
        for key in ["a", "b", "c"] {
            cache.set_at(key, String::new(), 1, 1_000, 0).await;
        }
        assert_eq!(cache.len().await, 2);
    }
}
