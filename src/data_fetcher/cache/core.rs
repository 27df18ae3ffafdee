use chrono::NaiveDate;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::CacheConfig;
use crate::constants::{cache_capacity, cache_ttl};
use crate::data_fetcher::models::{Fixture, Prediction};
use crate::error::AppError;

use super::persistent::{PersistedCache, PersistentStore};
use super::tier::TtlCache;
use super::types::{CacheInfo, CacheStats};

/// TTLs, capacities and the optional persistent file for [`PipelineCache`]
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub fixture_ttl: Duration,
    pub prediction_ttl: Duration,
    pub fixture_capacity: NonZeroUsize,
    pub prediction_capacity: NonZeroUsize,
    pub persistent_path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            fixture_ttl: Duration::from_secs(cache_ttl::FIXTURES_SECONDS),
            prediction_ttl: Duration::from_secs(cache_ttl::PREDICTIONS_SECONDS),
            fixture_capacity: NonZeroUsize::new(cache_capacity::FIXTURES)
                .unwrap_or(NonZeroUsize::MIN),
            prediction_capacity: NonZeroUsize::new(cache_capacity::PREDICTIONS)
                .unwrap_or(NonZeroUsize::MIN),
            persistent_path: None,
        }
    }
}

impl CacheSettings {
    /// Builds settings from the `[cache]` config table
    pub fn from_config(config: &CacheConfig) -> Result<Self, AppError> {
        let fixture_capacity = NonZeroUsize::new(config.fixture_capacity)
            .ok_or_else(|| AppError::config_error("cache.fixture_capacity must be at least 1"))?;
        let prediction_capacity = NonZeroUsize::new(config.prediction_capacity).ok_or_else(
            || AppError::config_error("cache.prediction_capacity must be at least 1"),
        )?;

        Ok(Self {
            fixture_ttl: Duration::from_secs(config.fixture_ttl_seconds),
            prediction_ttl: Duration::from_secs(config.prediction_ttl_seconds),
            fixture_capacity,
            prediction_capacity,
            persistent_path: config.persistent_path.as_ref().map(PathBuf::from),
        })
    }
}

/// Two-tier cache for the fixture pipeline.
///
/// - fixtures by date and scope (`YYYY-MM-DD|<scope>`), holding the enriched list
/// - predictions by fixture id, holding only non-empty predictions
///
/// When a persistent path is configured both tiers are mirrored to disk.
/// Disk problems are logged and never surface as errors from the lookup
/// or insert paths.
#[derive(Debug)]
pub struct PipelineCache {
    fixtures: TtlCache<String, Vec<Fixture>>,
    predictions: TtlCache<i64, Prediction>,
    persistent: Option<PersistentStore>,
    // Serializes snapshot + write so concurrent flushes cannot interleave.
    persist_lock: Mutex<()>,
}

impl PipelineCache {
    /// Creates empty tiers. Does not read the persistent file; see [`PipelineCache::open`].
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            fixtures: TtlCache::new("fixtures", settings.fixture_capacity, settings.fixture_ttl),
            predictions: TtlCache::new(
                "predictions",
                settings.prediction_capacity,
                settings.prediction_ttl,
            ),
            persistent: settings.persistent_path.map(PersistentStore::new),
            persist_lock: Mutex::new(()),
        }
    }

    /// Creates the cache and restores any unexpired entries from the persistent file.
    pub async fn open(settings: CacheSettings) -> Self {
        let cache = Self::new(settings);
        cache.load_persisted().await;
        cache
    }

    /// Cache key for a fixture date listed under `scope`.
    ///
    /// The scope names whatever shaped the list (timezone and league set), so
    /// a list cached under one configuration is never served to another.
    pub fn date_key(date: NaiveDate, scope: &str) -> String {
        format!("{}|{scope}", date.format("%Y-%m-%d"))
    }

    /// Restores entries from disk, returning how many were still fresh.
    pub async fn load_persisted(&self) -> usize {
        let Some(store) = &self.persistent else {
            return 0;
        };

        let persisted = store.load().await;
        let mut restored = 0;

        for (date, entry) in persisted.fixtures {
            if self.fixtures.restore(date, entry).await {
                restored += 1;
            }
        }
        for (fixture_id, entry) in persisted.predictions {
            if entry.data.is_empty() {
                continue;
            }
            if self.predictions.restore(fixture_id, entry).await {
                restored += 1;
            }
        }

        info!("Restored {} cache entries from disk", restored);
        restored
    }

    #[instrument(skip(self))]
    pub async fn get_fixtures(&self, date: NaiveDate, scope: &str) -> Option<Vec<Fixture>> {
        self.fixtures.get(&Self::date_key(date, scope)).await
    }

    /// Stores the enriched fixture list for a date and writes the persistent mirror.
    #[instrument(skip(self, fixtures), fields(count = fixtures.len()))]
    pub async fn put_fixtures(&self, date: NaiveDate, scope: &str, fixtures: Vec<Fixture>) {
        let key = Self::date_key(date, scope);
        debug!("Caching {} fixtures for {}", fixtures.len(), key);
        self.fixtures.put(key, fixtures).await;
        self.persist_best_effort().await;
    }

    #[instrument(skip(self))]
    pub async fn get_prediction(&self, fixture_id: i64) -> Option<Prediction> {
        self.predictions.get(&fixture_id).await
    }

    /// Stores a prediction. Empty predictions are refused so a later call
    /// asks upstream again; returns whether the value was stored.
    #[instrument(skip(self, prediction))]
    pub async fn put_prediction(&self, fixture_id: i64, prediction: Prediction) -> bool {
        if prediction.is_empty() {
            debug!("Not caching empty prediction for fixture {}", fixture_id);
            return false;
        }
        self.predictions.put(fixture_id, prediction).await;
        true
    }

    /// Clears both tiers and the persistent mirror.
    pub async fn clear(&self) {
        self.fixtures.clear().await;
        self.predictions.clear().await;
        info!("Cleared fixture and prediction caches");
        self.persist_best_effort().await;
    }

    /// Writes the current state to the persistent file, if one is configured.
    pub async fn flush(&self) -> Result<(), AppError> {
        let Some(store) = &self.persistent else {
            return Ok(());
        };

        let _guard = self.persist_lock.lock().await;
        let snapshot = PersistedCache {
            fixtures: self.fixtures.snapshot().await,
            predictions: self.predictions.snapshot().await,
            ..PersistedCache::default()
        };
        store.save(&snapshot).await
    }

    async fn persist_best_effort(&self) {
        if let Err(e) = self.flush().await {
            warn!("Failed to write persistent cache, continuing in memory only: {}", e);
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let (fixture_cache, prediction_cache): (CacheInfo, CacheInfo) =
            tokio::join!(self.fixtures.info(), self.predictions.info());
        CacheStats {
            fixture_cache,
            prediction_cache,
            persistent: self.persistent.is_some(),
        }
    }

    /// Dates currently held in the fixture tier under any scope, least
    /// recently used first
    pub async fn cached_dates(&self) -> Vec<String> {
        let mut dates: Vec<String> = Vec::new();
        for (key, _) in self.fixtures.snapshot().await {
            let date = key.split('|').next().unwrap_or_default().to_string();
            if !dates.contains(&date) {
                dates.push(date);
            }
        }
        dates
    }
}
