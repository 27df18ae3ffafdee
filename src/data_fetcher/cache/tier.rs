//! A single cache tier: LRU-bounded map whose entries expire after a fixed TTL

use lru::LruCache;
use std::fmt::Display;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::types::{CacheInfo, CachedEntry};

/// LRU cache with TTL support, safe to share between concurrent tasks.
///
/// Lookups take the write lock because `LruCache::get` updates recency.
#[derive(Debug)]
pub struct TtlCache<K: Hash + Eq, V> {
    name: &'static str,
    ttl: Duration,
    entries: RwLock<LruCache<K, CachedEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Clone,
{
    pub fn new(name: &'static str, capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Retrieves a value if present and not expired; expired entries are evicted.
    #[instrument(skip(self, key), fields(cache = self.name, key = %key))]
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.entries.write().await;

        if let Some(cached_entry) = cache.get(key) {
            if !cached_entry.is_expired(self.ttl) {
                debug!(
                    "Cache hit: cache={}, key={}, age={:?}",
                    self.name,
                    key,
                    cached_entry.age()
                );
                return Some(cached_entry.data.clone());
            }

            debug!(
                "Removing expired cache entry: cache={}, key={}, age={:?}, ttl={:?}",
                self.name,
                key,
                cached_entry.age(),
                self.ttl
            );
            cache.pop(key);
        } else {
            debug!("Cache miss: cache={}, key={}", self.name, key);
        }

        None
    }

    /// Inserts a value, evicting the least recently used entry when full.
    #[instrument(skip(self, key, value), fields(cache = self.name, key = %key))]
    pub async fn put(&self, key: K, value: V) {
        let mut cache = self.entries.write().await;
        if let Some((evicted, _)) = cache.push(key.clone(), CachedEntry::new(value))
            && evicted != key
        {
            debug!("Evicted LRU entry: cache={}, key={}", self.name, evicted);
        }
    }

    /// Re-inserts an entry with its original timestamp. Expired entries are skipped.
    pub async fn restore(&self, key: K, entry: CachedEntry<V>) -> bool {
        if entry.is_expired(self.ttl) {
            return false;
        }
        self.entries.write().await.put(key, entry);
        true
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn info(&self) -> CacheInfo {
        let cache = self.entries.read().await;
        CacheInfo {
            size: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    /// Live entries ordered least- to most-recently used, so that restoring
    /// them in order reproduces the same recency.
    pub async fn snapshot(&self) -> Vec<(K, CachedEntry<V>)> {
        let cache = self.entries.read().await;
        let mut live: Vec<(K, CachedEntry<V>)> = cache
            .iter()
            .filter(|(_, entry)| !entry.is_expired(self.ttl))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        live.reverse();
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    fn tier(capacity: usize, ttl: Duration) -> TtlCache<i64, String> {
        TtlCache::new("test", NonZeroUsize::new(capacity).unwrap(), ttl)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = tier(10, Duration::from_secs(60));
        cache.put(1, "one".to_string()).await;
        assert_eq!(cache.get(&1).await, Some("one".to_string()));
        assert_eq!(cache.get(&2).await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_evicted() {
        let cache = tier(10, Duration::from_millis(30));
        cache.put(1, "one".to_string()).await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(cache.get(&1).await, None);
        assert_eq!(cache.info().await.size, 0);
    }

    #[tokio::test]
    async fn test_capacity_bound_evicts_least_recently_used() {
        let cache = tier(3, Duration::from_secs(60));
        for i in 0..3 {
            cache.put(i, format!("value {i}")).await;
        }

        // Touch 0 so that 1 becomes the eviction candidate
        assert!(cache.get(&0).await.is_some());
        cache.put(3, "value 3".to_string()).await;

        assert_eq!(cache.info().await.size, 3);
        assert!(cache.get(&0).await.is_some());
        assert!(cache.get(&1).await.is_none());
        assert!(cache.get(&3).await.is_some());
    }

    #[tokio::test]
    async fn test_restore_skips_expired_entries() {
        let cache = tier(10, Duration::from_secs(3600));
        let stale = CachedEntry::with_timestamp("old".to_string(), Utc::now() - ChronoDuration::hours(2));
        let fresh = CachedEntry::with_timestamp("new".to_string(), Utc::now() - ChronoDuration::minutes(5));

        assert!(!cache.restore(1, stale).await);
        assert!(cache.restore(2, fresh).await);
        assert_eq!(cache.get(&1).await, None);
        assert_eq!(cache.get(&2).await, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_snapshot_orders_least_recent_first() {
        let cache = tier(10, Duration::from_secs(60));
        cache.put(1, "a".to_string()).await;
        cache.put(2, "b".to_string()).await;
        cache.put(3, "c".to_string()).await;
        let _ = cache.get(&1).await;

        let keys: Vec<i64> = cache.snapshot().await.into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_info_and_clear() {
        let cache = tier(5, Duration::from_secs(60));
        cache.put(1, "a".to_string()).await;
        cache.put(2, "b".to_string()).await;

        assert_eq!(cache.info().await, CacheInfo { size: 2, capacity: 5 });

        cache.clear().await;
        assert_eq!(cache.info().await.size, 0);
    }

    #[tokio::test]
    async fn test_concurrent_puts_respect_capacity() {
        let cache = std::sync::Arc::new(tier(16, Duration::from_secs(60)));
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.put(i, format!("v{i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.info().await.size, 16);
    }
}
