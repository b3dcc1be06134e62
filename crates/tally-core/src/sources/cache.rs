//! Local cache: a persisted key/value store holding serialized values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{SnapshotSource, SourceError, SourceKind, SourceResult};
use crate::models::{ActorProfile, Snapshot};

/// Key holding the serialized application snapshot.
pub const SNAPSHOT_KEY: &str = "minimalistRankingData";
/// Key holding the serialized actor profile.
pub const PROFILE_KEY: &str = "currentUser";
/// Default size limit of all stored keys and values, in bytes.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<BTreeMap<String, String>>>),
}

/// String key/value store persisted as one JSON object.
///
/// Clones share the same backing file or map. Writes go through a mutex so
/// concurrent setters in one process cannot interleave their file writes.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    backend: Backend,
    quota_bytes: usize,
    io_lock: Arc<Mutex<()>>,
}

impl KeyValueStore {
    /// Open a store backed by the JSON file at `path` (created on first write).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            io_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open a process-local store (primarily for tests).
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(BTreeMap::new()))),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            io_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    pub async fn get(&self, key: &str) -> SourceResult<Option<String>> {
        let _guard = self.io_lock.lock().await;
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    /// Writes over a corrupt backing file instead of failing, so the cache
    /// heals on the next save.
    pub async fn set(&self, key: &str, value: &str) -> SourceResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries_for_write().await?;
        entries.insert(key.to_string(), value.to_string());

        let needed = entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum::<usize>();
        if needed > self.quota_bytes {
            return Err(SourceError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        self.write_entries(entries).await
    }

    pub async fn remove(&self, key: &str) -> SourceResult<()> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries_for_write().await?;
        if entries.remove(key).is_some() {
            self.write_entries(entries).await?;
        }
        Ok(())
    }

    async fn read_entries(&self) -> SourceResult<BTreeMap<String, String>> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.lock().await.clone()),
            Backend::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(raw) => Ok(serde_json::from_str(&raw)?),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(error) => Err(error.into()),
            },
        }
    }

    async fn read_entries_for_write(&self) -> SourceResult<BTreeMap<String, String>> {
        match self.read_entries().await {
            Err(SourceError::Malformed(error)) => {
                tracing::warn!(
                    path = ?self.path(),
                    error = %error,
                    "Discarding unreadable local cache"
                );
                Ok(BTreeMap::new())
            }
            result => result,
        }
    }

    async fn write_entries(&self, entries: BTreeMap<String, String>) -> SourceResult<()> {
        match &self.backend {
            Backend::Memory(map) => {
                *map.lock().await = entries;
                Ok(())
            }
            Backend::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let serialized = serde_json::to_string_pretty(&entries)?;
                let tmp_path = path.with_extension("json.tmp");
                tokio::fs::write(&tmp_path, serialized).await?;
                tokio::fs::rename(&tmp_path, path).await?;
                Ok(())
            }
        }
    }
}

/// Snapshot tier backed by a [`KeyValueStore`], plus the actor profile.
#[derive(Debug, Clone)]
pub struct LocalCache {
    store: KeyValueStore,
}

impl LocalCache {
    pub const fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    pub async fn load_profile(&self) -> SourceResult<Option<ActorProfile>> {
        match self.store.get(PROFILE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save_profile(&self, profile: &ActorProfile) -> SourceResult<()> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &raw).await
    }

    pub async fn clear_profile(&self) -> SourceResult<()> {
        self.store.remove(PROFILE_KEY).await
    }
}

#[async_trait]
impl SnapshotSource for LocalCache {
    fn kind(&self) -> SourceKind {
        SourceKind::Cache
    }

    fn describe(&self) -> String {
        self.store.path().map_or_else(
            || "in-memory cache".to_string(),
            |path| path.display().to_string(),
        )
    }

    async fn load(&self) -> SourceResult<Snapshot> {
        let raw = self.store.get(SNAPSHOT_KEY).await?.ok_or(SourceError::Missing)?;
        Ok(Snapshot::from_json(&raw)?)
    }

    async fn save(&self, snapshot: &Snapshot) -> SourceResult<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.store.set(SNAPSHOT_KEY, &raw).await
    }
}
