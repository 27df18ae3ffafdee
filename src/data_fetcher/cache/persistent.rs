//! Best-effort on-disk mirror of the in-memory cache tiers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::types::CachedEntry;
use crate::data_fetcher::models::{Fixture, Prediction};
use crate::error::AppError;

/// Bumped whenever the on-disk layout changes; other versions load as empty.
pub const PERSISTED_CACHE_VERSION: u32 = 2;

/// Serialized form of both cache tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedCache {
    pub version: u32,
    #[serde(default)]
    pub fixtures: Vec<(String, CachedEntry<Vec<Fixture>>)>,
    #[serde(default)]
    pub predictions: Vec<(i64, CachedEntry<Prediction>)>,
}

impl Default for PersistedCache {
    fn default() -> Self {
        Self {
            version: PERSISTED_CACHE_VERSION,
            fixtures: Vec::new(),
            predictions: Vec::new(),
        }
    }
}

/// JSON file holding a [`PersistedCache`].
#[derive(Debug, Clone)]
pub struct PersistentStore {
    path: PathBuf,
}

impl PersistentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the cache file. A missing, unreadable, corrupt or outdated file
    /// yields an empty cache and a warning; it never fails.
    pub async fn load(&self) -> PersistedCache {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No persistent cache at {}", self.path.display());
                return PersistedCache::default();
            }
            Err(e) => {
                warn!(
                    "Failed to read persistent cache {}: {}. Starting with an empty cache",
                    self.path.display(),
                    e
                );
                return PersistedCache::default();
            }
        };

        match serde_json::from_str::<PersistedCache>(&content) {
            Ok(cache) if cache.version == PERSISTED_CACHE_VERSION => {
                info!(
                    "Loaded persistent cache from {}: {} dates, {} predictions",
                    self.path.display(),
                    cache.fixtures.len(),
                    cache.predictions.len()
                );
                cache
            }
            Ok(cache) => {
                warn!(
                    "Ignoring persistent cache {} with version {} (expected {})",
                    self.path.display(),
                    cache.version,
                    PERSISTED_CACHE_VERSION
                );
                PersistedCache::default()
            }
            Err(e) => {
                warn!(
                    "Persistent cache {} is corrupt: {}. Starting with an empty cache",
                    self.path.display(),
                    e
                );
                PersistedCache::default()
            }
        }
    }

    /// Writes the cache to a temp file next to the target and renames it into
    /// place, so an interrupted write leaves the previous file intact.
    pub async fn save(&self, cache: &PersistedCache) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_vec(cache)?;
        let tmp_path = self.temp_path();

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&content).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(
            "Persisted cache to {}: {} bytes",
            self.path.display(),
            content.len()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
