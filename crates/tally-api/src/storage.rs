//! Persistence for the single board snapshot the backend serves.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tally_core::Snapshot;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::{AppConfig, StorageMode};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// The stored snapshot, or `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    fn describe(&self) -> String;
}

pub fn repository_from_config(config: &AppConfig) -> Box<dyn SnapshotRepository> {
    match config.storage {
        StorageMode::File => Box::new(JsonFileRepository::new(config.data_file.clone())),
        StorageMode::Memory => Box::new(MemoryRepository::default()),
    }
}

/// Pretty-printed JSON document on disk.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(Snapshot::from_json(&raw)?)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let serialized = snapshot.to_json_pretty()?;
        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, serialized).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path().display())
    }
}

#[derive(Debug, Default)]
pub struct MemoryRepository {
    snapshot: Mutex<Option<Snapshot>>,
}

#[async_trait]
impl SnapshotRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        *self.snapshot.lock().await = Some(snapshot.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tally_core::{Participant, ParticipantId};

    use super::*;

    fn sample_snapshot() -> Snapshot {
        let participants = vec![Participant::new(ParticipantId::new(1), "Alice", Utc::now())];
        Snapshot::capture(&participants, false, Utc::now())
    }

    #[tokio::test]
    async fn file_repository_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path().join("nested").join("data.json"));
        assert_eq!(repository.load().await.unwrap(), None);

        let snapshot = sample_snapshot();
        repository.save(&snapshot).await.unwrap();

        assert_eq!(repository.load().await.unwrap(), Some(snapshot));
        let raw = std::fs::read_to_string(repository.path()).unwrap();
        assert!(raw.contains("\n  \"participants\""));
    }

    #[tokio::test]
    async fn file_repository_reports_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repository = JsonFileRepository::new(path);
        assert!(matches!(
            repository.load().await,
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn memory_repository_starts_empty() {
        let repository = MemoryRepository::default();
        assert_eq!(repository.load().await.unwrap(), None);

        repository.save(&sample_snapshot()).await.unwrap();
        assert!(repository.load().await.unwrap().is_some());
    }
}
