//! Reconciler: fixed-precedence reads and fan-out writes across sources.
//!
//! Reads walk remote store, static snapshot, then local cache and stop at the
//! first success. There is no merge; whichever tier answers first wins and is
//! mirrored into the local cache. Writes always land in the local cache first,
//! then go to the remote store when one is configured.

use crate::models::Snapshot;
use crate::sources::{SnapshotSource, SourceKind};
use crate::state::SyncStatus;

/// Result of [`Reconciler::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub snapshot: Snapshot,
    pub status: SyncStatus,
    /// Tier that served the snapshot, `None` when nothing was found
    pub source: Option<SourceKind>,
}

pub struct Reconciler {
    /// Remote store then static snapshot, in precedence order
    upstream: Vec<Box<dyn SnapshotSource>>,
    cache: Box<dyn SnapshotSource>,
    local_authoritative: bool,
}

/// Builder that keeps the precedence order regardless of call order.
pub struct ReconcilerBuilder {
    cache: Box<dyn SnapshotSource>,
    remote: Option<Box<dyn SnapshotSource>>,
    static_snapshot: Option<Box<dyn SnapshotSource>>,
    local_authoritative: bool,
}

impl ReconcilerBuilder {
    #[must_use]
    pub fn remote(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.remote = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn static_snapshot(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.static_snapshot = Some(Box::new(source));
        self
    }

    /// Report `synced` for cache-only saves when no remote is configured.
    #[must_use]
    pub const fn local_authoritative(mut self, local_authoritative: bool) -> Self {
        self.local_authoritative = local_authoritative;
        self
    }

    pub fn build(self) -> Reconciler {
        let upstream = self
            .remote
            .into_iter()
            .chain(self.static_snapshot)
            .collect();
        Reconciler {
            upstream,
            cache: self.cache,
            local_authoritative: self.local_authoritative,
        }
    }
}

impl Reconciler {
    pub fn builder(cache: impl SnapshotSource + 'static) -> ReconcilerBuilder {
        ReconcilerBuilder {
            cache: Box::new(cache),
            remote: None,
            static_snapshot: None,
            local_authoritative: false,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote().is_some()
    }

    fn remote(&self) -> Option<&dyn SnapshotSource> {
        self.upstream
            .iter()
            .find(|source| source.kind() == SourceKind::Remote)
            .map(|source| &**source)
    }

    /// Populate from the best available source. Never fails: unavailable
    /// sources are logged and skipped.
    pub async fn load(&self) -> LoadOutcome {
        for source in &self.upstream {
            match source.load().await {
                Ok(snapshot) => {
                    tracing::info!(
                        source = source.kind().as_str(),
                        location = %source.describe(),
                        participants = snapshot.participants.len(),
                        "Loaded snapshot"
                    );
                    if let Err(error) = self.cache.save(&snapshot).await {
                        tracing::warn!("Failed to mirror snapshot into local cache: {error}");
                    }
                    return LoadOutcome {
                        status: source.kind().loaded_status(),
                        source: Some(source.kind()),
                        snapshot,
                    };
                }
                Err(error) => {
                    tracing::warn!(
                        source = source.kind().as_str(),
                        location = %source.describe(),
                        "Source unavailable, falling back: {error}"
                    );
                }
            }
        }

        match self.cache.load().await {
            Ok(snapshot) => {
                tracing::info!(
                    participants = snapshot.participants.len(),
                    "Loaded snapshot from local cache"
                );
                LoadOutcome {
                    snapshot,
                    status: SyncStatus::Local,
                    source: Some(SourceKind::Cache),
                }
            }
            Err(error) => {
                tracing::info!("No stored data, starting empty: {error}");
                LoadOutcome {
                    snapshot: Snapshot::default(),
                    status: SyncStatus::Empty,
                    source: None,
                }
            }
        }
    }

    /// Persist a full snapshot: local cache first, then the remote store.
    pub async fn save(&self, snapshot: &Snapshot) -> SyncStatus {
        if let Err(error) = self.cache.save(snapshot).await {
            tracing::error!(
                location = %self.cache.describe(),
                "Local cache write failed: {error}"
            );
            return SyncStatus::Error;
        }

        let Some(remote) = self.remote() else {
            return if self.local_authoritative {
                SyncStatus::Synced
            } else {
                SyncStatus::Local
            };
        };

        match remote.save(snapshot).await {
            Ok(()) => {
                tracing::debug!(location = %remote.describe(), "Remote save succeeded");
                SyncStatus::Synced
            }
            Err(error) => {
                tracing::warn!(
                    location = %remote.describe(),
                    "Remote save failed, data kept locally: {error}"
                );
                SyncStatus::Local
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Participant, ParticipantId};
    use crate::sources::{KeyValueStore, LocalCache, MemorySource};

    fn snapshot_with(names: &[&str], dark: bool) -> Snapshot {
        let participants = names
            .iter()
            .zip(1..)
            .map(|(name, id)| Participant::new(ParticipantId::new(id), *name, Utc::now()))
            .collect::<Vec<_>>();
        Snapshot::capture(&participants, dark, Utc::now())
    }

    fn names(snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .participants
            .iter()
            .map(|participant| participant.name.clone())
            .collect()
    }

    #[tokio::test]
    async fn remote_wins_over_cache_without_merging() {
        let remote = MemorySource::with_snapshot(SourceKind::Remote, snapshot_with(&["X"], true));
        let statics = MemorySource::with_snapshot(SourceKind::Static, snapshot_with(&["S"], false));
        let cache = MemorySource::with_snapshot(SourceKind::Cache, snapshot_with(&["Y"], false));
        let reconciler = Reconciler::builder(cache.clone())
            .static_snapshot(statics.clone())
            .remote(remote)
            .build();

        let outcome = reconciler.load().await;

        assert_eq!(names(&outcome.snapshot), vec!["X"]);
        assert!(outcome.snapshot.is_dark_mode());
        assert_eq!(outcome.status, SyncStatus::Synced);
        assert_eq!(outcome.source, Some(SourceKind::Remote));
        assert_eq!(statics.load_count(), 0);
        let mirrored = cache.snapshot().await.unwrap();
        assert_eq!(names(&mirrored), vec!["X"]);
    }

    #[tokio::test]
    async fn static_snapshot_is_used_when_remote_fails() {
        let remote = MemorySource::with_snapshot(SourceKind::Remote, snapshot_with(&["X"], false));
        remote.set_unavailable(true);
        let statics = MemorySource::with_snapshot(SourceKind::Static, snapshot_with(&["S"], false));
        let cache = MemorySource::with_snapshot(SourceKind::Cache, snapshot_with(&["Y"], false));
        let reconciler = Reconciler::builder(cache.clone())
            .remote(remote.clone())
            .static_snapshot(statics)
            .build();

        let outcome = reconciler.load().await;

        assert_eq!(names(&outcome.snapshot), vec!["S"]);
        assert_eq!(outcome.status, SyncStatus::Local);
        assert_eq!(outcome.source, Some(SourceKind::Static));
        assert_eq!(remote.load_count(), 1);
        assert_eq!(names(&cache.snapshot().await.unwrap()), vec!["S"]);
    }

    #[tokio::test]
    async fn static_snapshot_beats_cache_without_remote() {
        let statics = MemorySource::with_snapshot(SourceKind::Static, snapshot_with(&["S"], true));
        let cache =
            MemorySource::with_snapshot(SourceKind::Cache, snapshot_with(&["Y", "Z"], false));
        let reconciler = Reconciler::builder(cache.clone())
            .static_snapshot(statics)
            .build();

        let outcome = reconciler.load().await;

        assert_eq!(names(&outcome.snapshot), vec!["S"]);
        assert!(outcome.snapshot.is_dark_mode());
        assert_eq!(outcome.status, SyncStatus::Local);
        assert_eq!(outcome.source, Some(SourceKind::Static));
        assert_eq!(cache.load_count(), 0);
        assert_eq!(names(&cache.snapshot().await.unwrap()), vec!["S"]);
    }

    #[tokio::test]
    async fn cache_is_the_last_resort() {
        let remote = MemorySource::new(SourceKind::Remote);
        remote.set_unavailable(true);
        let statics = MemorySource::new(SourceKind::Static);
        let cache = MemorySource::with_snapshot(SourceKind::Cache, snapshot_with(&["Y"], true));
        let reconciler = Reconciler::builder(cache)
            .remote(remote)
            .static_snapshot(statics)
            .build();

        let outcome = reconciler.load().await;

        assert_eq!(names(&outcome.snapshot), vec!["Y"]);
        assert!(outcome.snapshot.is_dark_mode());
        assert_eq!(outcome.status, SyncStatus::Local);
        assert_eq!(outcome.source, Some(SourceKind::Cache));
    }

    #[tokio::test]
    async fn nothing_anywhere_yields_empty() {
        let reconciler = Reconciler::builder(MemorySource::new(SourceKind::Cache))
            .remote(MemorySource::new(SourceKind::Remote))
            .build();

        let outcome = reconciler.load().await;

        assert_eq!(outcome.snapshot, Snapshot::default());
        assert_eq!(outcome.status, SyncStatus::Empty);
        assert_eq!(outcome.source, None);
    }

    #[tokio::test]
    async fn remote_with_zero_participants_still_wins() {
        let remote = MemorySource::with_snapshot(SourceKind::Remote, snapshot_with(&[], false));
        let cache = MemorySource::with_snapshot(SourceKind::Cache, snapshot_with(&["Y"], false));
        let reconciler = Reconciler::builder(cache).remote(remote).build();

        let outcome = reconciler.load().await;

        assert!(outcome.snapshot.participants.is_empty());
        assert_eq!(outcome.status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn save_writes_cache_then_remote() {
        let remote = MemorySource::new(SourceKind::Remote);
        let cache = MemorySource::new(SourceKind::Cache);
        let reconciler = Reconciler::builder(cache.clone())
            .remote(remote.clone())
            .build();
        let snapshot = snapshot_with(&["A"], false);

        let status = reconciler.save(&snapshot).await;

        assert_eq!(status, SyncStatus::Synced);
        assert_eq!(cache.snapshot().await, Some(snapshot.clone()));
        assert_eq!(remote.snapshot().await, Some(snapshot));
    }

    #[tokio::test]
    async fn remote_failure_downgrades_to_local() {
        let remote = MemorySource::new(SourceKind::Remote);
        remote.set_unavailable(true);
        let cache = MemorySource::new(SourceKind::Cache);
        let reconciler = Reconciler::builder(cache.clone()).remote(remote).build();
        let snapshot = snapshot_with(&["A"], false);

        assert_eq!(reconciler.save(&snapshot).await, SyncStatus::Local);
        assert_eq!(cache.snapshot().await, Some(snapshot));
    }

    #[tokio::test]
    async fn cache_failure_is_an_error_and_skips_remote() {
        let remote = MemorySource::new(SourceKind::Remote);
        let cache = MemorySource::new(SourceKind::Cache);
        cache.set_unavailable(true);
        let reconciler = Reconciler::builder(cache).remote(remote.clone()).build();

        let status = reconciler.save(&snapshot_with(&["A"], false)).await;

        assert_eq!(status, SyncStatus::Error);
        assert_eq!(remote.save_count(), 0);
    }

    #[tokio::test]
    async fn quota_exceeded_cache_reports_error() {
        let cache = LocalCache::new(KeyValueStore::in_memory().with_quota(32));
        let reconciler = Reconciler::builder(cache).build();

        let status = reconciler.save(&snapshot_with(&["A", "B"], false)).await;
        assert_eq!(status, SyncStatus::Error);
    }

    #[tokio::test]
    async fn cache_only_save_is_local_unless_authoritative() {
        let snapshot = snapshot_with(&["A"], false);

        let plain = Reconciler::builder(MemorySource::new(SourceKind::Cache)).build();
        assert_eq!(plain.save(&snapshot).await, SyncStatus::Local);
        assert!(!plain.has_remote());

        let authoritative = Reconciler::builder(MemorySource::new(SourceKind::Cache))
            .local_authoritative(true)
            .build();
        assert_eq!(authoritative.save(&snapshot).await, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn static_snapshot_is_never_written() {
        let statics = MemorySource::new(SourceKind::Static);
        let reconciler = Reconciler::builder(MemorySource::new(SourceKind::Cache))
            .static_snapshot(statics.clone())
            .build();

        reconciler.save(&snapshot_with(&["A"], false)).await;
        assert_eq!(statics.save_count(), 0);
    }
}
