//! Cache data structures with TTL support

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

/// A cached value with the wall-clock time it was inserted.
///
/// Wall-clock time (rather than `Instant`) lets entries survive a round trip
/// through the persistent cache file with their age intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedEntry<T> {
    /// Creates a new entry stamped with the current time
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_timestamp(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    /// Age of the entry. Entries stamped in the future count as brand new.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.cached_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Checks if the entry has outlived `ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let age = self.age();
        let is_expired = age > ttl;
        trace!(
            "Cache expiration check: age={:?}, ttl={:?}, is_expired={}",
            age, ttl, is_expired
        );
        is_expired
    }
}

/// Size and capacity of one cache tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInfo {
    pub size: usize,
    pub capacity: usize,
}

/// Combined cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub fixture_cache: CacheInfo,
    pub prediction_cache: CacheInfo,
    pub persistent: bool,
}
