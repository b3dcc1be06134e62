//! Process-local source, useful as a stand-in for any tier.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{SnapshotSource, SourceError, SourceKind, SourceResult};
use crate::models::Snapshot;

#[derive(Debug, Default)]
struct Inner {
    snapshot: Mutex<Option<Snapshot>>,
    unavailable: AtomicBool,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

/// In-memory source posing as the given tier.
///
/// Clones share state, so a caller can keep a handle after boxing one copy
/// into a reconciler and inspect what was written.
#[derive(Debug, Clone)]
pub struct MemorySource {
    kind: SourceKind,
    inner: Arc<Inner>,
}

impl MemorySource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            inner: Arc::new(Inner::default()),
        }
    }

    pub fn with_snapshot(kind: SourceKind, snapshot: Snapshot) -> Self {
        Self {
            kind,
            inner: Arc::new(Inner {
                snapshot: Mutex::new(Some(snapshot)),
                ..Inner::default()
            }),
        }
    }

    /// Make every subsequent load and save fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.inner.snapshot.lock().await.clone()
    }

    pub fn load_count(&self) -> usize {
        self.inner.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> SourceResult<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            Err(SourceError::Status("unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn describe(&self) -> String {
        format!("in-memory {}", self.kind.as_str())
    }

    async fn load(&self) -> SourceResult<Snapshot> {
        self.inner.loads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.inner
            .snapshot
            .lock()
            .await
            .clone()
            .ok_or(SourceError::Missing)
    }

    async fn save(&self, snapshot: &Snapshot) -> SourceResult<()> {
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.kind == SourceKind::Static {
            return Err(SourceError::ReadOnly);
        }
        *self.inner.snapshot.lock().await = Some(snapshot.clone());
        Ok(())
    }
}
