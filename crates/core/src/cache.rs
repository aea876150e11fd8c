use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::{
    config::Settings,
    error::{RecapError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Metadata,
    Summary,
    Analysis,
}

impl CacheKind {
    fn dir_name(&self) -> &'static str {
        match self {
            CacheKind::Metadata => "metadata",
            CacheKind::Summary => "summaries",
            CacheKind::Analysis => "analyses",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheTtl {
    pub metadata: Duration,
    pub summary: Duration,
    pub analysis: Duration,
}

impl CacheTtl {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            metadata: settings.metadata_ttl(),
            summary: settings.summary_ttl(),
            analysis: settings.summary_ttl(),
        }
    }

    fn for_kind(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::Metadata => self.metadata,
            CacheKind::Summary => self.summary,
            CacheKind::Analysis => self.analysis,
        }
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    stored_at_ms: u64,
    value: T,
}

/// JSON file cache with a fixed expiry per entry kind.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
    ttl: CacheTtl,
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("recap")
}

impl Cache {
    pub fn new(root: impl Into<PathBuf>, ttl: CacheTtl) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let root = settings
            .cache_dir
            .clone()
            .unwrap_or_else(get_root_cache_dir);
        Self::new(root, CacheTtl::from_settings(settings))
    }

    /// Stable key from its parts.
    pub fn key(parts: &[&str]) -> String {
        let mut hasher = DefaultHasher::new();
        parts.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    fn entry_path(&self, kind: CacheKind, key: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(format!("{}.json", key))
    }

    /// Cached value, or `None` when missing, expired or unreadable.
    pub async fn get<T: DeserializeOwned>(&self, kind: CacheKind, key: &str) -> Option<T> {
        let path = self.entry_path(kind, key);
        let content = fs::read_to_string(&path).await.ok()?;

        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Discarding unreadable cache entry");
                let _ = fs::remove_file(&path).await;
                return None;
            }
        };

        let age = now_ms().saturating_sub(entry.stored_at_ms);
        if Duration::from_millis(age) >= self.ttl.for_kind(kind) {
            tracing::debug!(path = %path.display(), "Cache entry expired");
            let _ = fs::remove_file(&path).await;
            return None;
        }

        Some(entry.value)
    }

    pub async fn put<T: Serialize>(&self, kind: CacheKind, key: &str, value: &T) -> Result<()> {
        let path = self.entry_path(kind, key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| cache_error(dir, e))?;
        }

        let entry = CacheEntry {
            stored_at_ms: now_ms(),
            value,
        };
        let json = serde_json::to_string(&entry)?;
        fs::write(&path, json).await.map_err(|e| cache_error(&path, e))?;
        Ok(())
    }

    /// Remove every cached entry.
    pub async fn clear(&self) -> Result<()> {
        for kind in [CacheKind::Metadata, CacheKind::Summary, CacheKind::Analysis] {
            let dir = self.root.join(kind.dir_name());
            if fs::try_exists(&dir).await? {
                fs::remove_dir_all(&dir).await.map_err(|e| cache_error(&dir, e))?;
            }
        }
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn cache_error(path: &Path, e: std::io::Error) -> RecapError {
    RecapError::Cache {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}
