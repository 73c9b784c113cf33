//! Remote style catalog with memory and disk caching
//!
//! The catalog is a JSON array of `{name, description, homepage, url}`
//! records published alongside the Vale style packages.

use super::StyleRecord;
use crate::errors::{Result, ValeError};
use crate::fetch::Fetcher;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Official style library listing
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/errata-ai/styles/master/library.json";

/// Cache entry with timestamp and the URL it was fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    #[serde(default)]
    url: String,
    styles: Vec<StyleRecord>,
    timestamp: u64,
}

/// Style catalog client
pub struct StyleCatalog {
    url: String,
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    cache_path: Option<PathBuf>,
    ttl_secs: u64,
}

impl StyleCatalog {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            url: url.into(),
            fetcher,
            cache: Arc::new(RwLock::new(None)),
            cache_path: None,
            ttl_secs: 86400,
        }
    }

    /// Persist the catalog under `cache_dir` between runs
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_path = Some(cache_dir.join("catalog.json"));
        self
    }

    /// Cache lifetime; 0 disables caching entirely
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn current_timestamp() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn is_cache_valid(&self, entry: &CacheEntry) -> bool {
        if entry.url != self.url {
            return false;
        }
        let now = Self::current_timestamp();
        now.saturating_sub(entry.timestamp) < self.ttl_secs
    }

    async fn load_disk_cache(&self) -> Option<CacheEntry> {
        let path = self.cache_path.as_ref()?;
        let content = tokio::fs::read_to_string(path).await.ok()?;
        serde_json::from_str(&content).ok()
    }

    async fn save_disk_cache(&self, entry: &CacheEntry) {
        if let Some(ref path) = self.cache_path {
            if let Some(parent) = path.parent() {
                let _ = tokio::fs::create_dir_all(parent).await;
            }
            if let Ok(content) = serde_json::to_string(entry) {
                if let Err(e) = tokio::fs::write(path, content).await {
                    tracing::debug!("Failed to write catalog cache {}: {}", path.display(), e);
                }
            }
        }
    }

    async fn fetch_remote(&self) -> Result<Vec<StyleRecord>> {
        tracing::info!("Fetching style catalog from {}", self.url);

        let body = self.fetcher.fetch(&self.url).await?;
        let styles: Vec<StyleRecord> = serde_json::from_slice(&body)
            .map_err(|e| ValeError::NetworkFailure(format!("Invalid catalog JSON: {}", e)))?;

        tracing::info!("Loaded {} styles from catalog", styles.len());
        Ok(styles)
    }

    /// Get the catalog (with caching)
    pub async fn styles(&self) -> Result<Vec<StyleRecord>> {
        if self.ttl_secs > 0 {
            {
                let cache = self.cache.read().await;
                if let Some(ref entry) = *cache {
                    if self.is_cache_valid(entry) {
                        return Ok(entry.styles.clone());
                    }
                }
            }

            if let Some(entry) = self.load_disk_cache().await {
                if self.is_cache_valid(&entry) {
                    let styles = entry.styles.clone();
                    *self.cache.write().await = Some(entry);
                    return Ok(styles);
                }
            }
        }

        let styles = self.fetch_remote().await?;
        let entry = CacheEntry {
            url: self.url.clone(),
            styles: styles.clone(),
            timestamp: Self::current_timestamp(),
        };

        if self.ttl_secs > 0 {
            self.save_disk_cache(&entry).await;
        }
        *self.cache.write().await = Some(entry);

        Ok(styles)
    }

    /// Look up a catalog entry by exact name
    pub async fn get(&self, name: &str) -> Result<Option<StyleRecord>> {
        Ok(self.styles().await?.into_iter().find(|s| s.name == name))
    }

    /// Drop the in-memory and on-disk caches so the next call refetches
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
        if let Some(ref path) = self.cache_path {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("Failed to remove catalog cache {}: {}", path.display(), e);
                }
            }
        }
    }
}
