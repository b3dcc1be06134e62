//! The board controller: owns the participant store and persists every change.

use chrono::Utc;

use crate::models::{Participant, ParticipantId, Snapshot};
use crate::reconciler::{LoadOutcome, Reconciler};
use crate::state::SyncStatus;
use crate::store::{ParticipantStore, StoreError};

/// A successful mutation together with the status of the save it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardUpdate {
    pub participant: Participant,
    pub status: SyncStatus,
}

/// Single owner of the in-memory state.
pub struct Board {
    store: ParticipantStore,
    dark_mode: bool,
    actor: String,
    reconciler: Reconciler,
    status: SyncStatus,
}

impl Board {
    pub fn new(reconciler: Reconciler, actor: impl Into<String>) -> Self {
        Self {
            store: ParticipantStore::new(),
            dark_mode: false,
            actor: actor.into(),
            reconciler,
            status: SyncStatus::Empty,
        }
    }

    /// Replace the in-memory state with the best available snapshot.
    pub async fn load(&mut self) -> LoadOutcome {
        let outcome = self.reconciler.load().await;
        self.store.replace(outcome.snapshot.participants.clone());
        self.dark_mode = outcome.snapshot.is_dark_mode();
        self.status = outcome.status;
        outcome
    }

    /// Write a fresh full snapshot of the current state.
    pub async fn save(&mut self) -> SyncStatus {
        let snapshot = self.snapshot();
        self.status = self.reconciler.save(&snapshot).await;
        self.status
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.store.participants(), self.dark_mode, Utc::now())
    }

    pub const fn store(&self) -> &ParticipantStore {
        &self.store
    }

    pub const fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Status of the last load or save.
    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn has_remote(&self) -> bool {
        self.reconciler.has_remote()
    }

    /// Resolve a participant by id or case-insensitive name.
    pub fn resolve(&self, query: &str) -> Result<ParticipantId, StoreError> {
        self.store
            .find(query)
            .map(|participant| participant.id)
            .ok_or_else(|| StoreError::NotFound(query.trim().to_string()))
    }

    pub async fn add_participant(&mut self, name: &str) -> Result<BoardUpdate, StoreError> {
        let participant = self.store.add(name, &self.actor)?.clone();
        Ok(self.persist(participant).await)
    }

    pub async fn increment(&mut self, id: ParticipantId) -> Result<BoardUpdate, StoreError> {
        let participant = self.store.increment(id, &self.actor)?.clone();
        Ok(self.persist(participant).await)
    }

    pub async fn decrement(&mut self, id: ParticipantId) -> Result<BoardUpdate, StoreError> {
        let participant = self.store.decrement(id, &self.actor)?.clone();
        Ok(self.persist(participant).await)
    }

    /// Remove a participant. Confirmation is up to the caller.
    pub async fn remove(&mut self, id: ParticipantId) -> Result<BoardUpdate, StoreError> {
        let participant = self.store.remove(id, &self.actor)?;
        Ok(self.persist(participant).await)
    }

    /// Flip the dark-mode preference and persist it.
    pub async fn toggle_dark_mode(&mut self) -> SyncStatus {
        self.dark_mode = !self.dark_mode;
        self.save().await
    }

    /// Drop every participant and persist the empty board.
    pub async fn reset(&mut self) -> SyncStatus {
        self.store.clear();
        self.save().await
    }

    async fn persist(&mut self, participant: Participant) -> BoardUpdate {
        let status = self.save().await;
        BoardUpdate {
            participant,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{ActivityAction, Participant, ParticipantId};
    use crate::sources::{MemorySource, SourceKind};

    fn board_with(cache: &MemorySource, remote: Option<&MemorySource>) -> Board {
        let mut builder = Reconciler::builder(cache.clone());
        if let Some(remote) = remote {
            builder = builder.remote(remote.clone());
        }
        Board::new(builder.build(), "tester")
    }

    #[tokio::test]
    async fn mutations_are_saved_to_every_tier() {
        let cache = MemorySource::new(SourceKind::Cache);
        let remote = MemorySource::new(SourceKind::Remote);
        let mut board = board_with(&cache, Some(&remote));

        let update = board.add_participant("Alice").await.unwrap();
        assert_eq!(update.status, SyncStatus::Synced);
        assert_eq!(update.participant.name, "Alice");

        board.increment(update.participant.id).await.unwrap();

        let stored = remote.snapshot().await.unwrap();
        assert_eq!(stored.participants.len(), 1);
        assert_eq!(stored.participants[0].count, 1);
        assert_eq!(cache.snapshot().await, Some(stored));
        assert_eq!(board.status(), SyncStatus::Synced);
    }

    #[tokio::test]
    async fn validation_errors_do_not_save() {
        let cache = MemorySource::new(SourceKind::Cache);
        let mut board = board_with(&cache, None);

        board.add_participant("Alice").await.unwrap();
        let saves = cache.save_count();

        let error = board.add_participant("ALICE").await.unwrap_err();
        assert_eq!(error, StoreError::DuplicateName("ALICE".to_string()));
        let id = board.resolve("alice").unwrap();
        assert!(board.decrement(id).await.is_err());

        assert_eq!(cache.save_count(), saves);
        assert_eq!(board.store().len(), 1);
    }

    #[tokio::test]
    async fn remove_returns_record_with_final_entry() {
        let cache = MemorySource::new(SourceKind::Cache);
        let mut board = board_with(&cache, None);
        let id = board.add_participant("Alice").await.unwrap().participant.id;

        let update = board.remove(id).await.unwrap();

        assert_eq!(
            update.participant.activity_log.latest().map(|entry| entry.action),
            Some(ActivityAction::Removed)
        );
        assert!(board.store().is_empty());
        assert!(cache.snapshot().await.unwrap().participants.is_empty());
    }

    #[tokio::test]
    async fn load_adopts_snapshot_and_dark_mode() {
        let participants = vec![Participant::new(ParticipantId::new(5), "Y", Utc::now())];
        let cache = MemorySource::with_snapshot(
            SourceKind::Cache,
            Snapshot::capture(&participants, true, Utc::now()),
        );
        let mut board = board_with(&cache, None);

        let outcome = board.load().await;

        assert_eq!(outcome.status, SyncStatus::Local);
        assert!(board.is_dark_mode());
        assert_eq!(board.store().participants(), participants.as_slice());
    }

    #[tokio::test]
    async fn toggle_dark_mode_persists_preference() {
        let cache = MemorySource::new(SourceKind::Cache);
        let mut board = board_with(&cache, None);

        assert_eq!(board.toggle_dark_mode().await, SyncStatus::Local);
        assert!(cache.snapshot().await.unwrap().is_dark_mode());
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let cache = MemorySource::new(SourceKind::Cache);
        let mut board = board_with(&cache, None);
        board.add_participant("A").await.unwrap();
        board.add_participant("B").await.unwrap();

        board.reset().await;

        assert!(board.store().is_empty());
        assert_eq!(cache.snapshot().await.unwrap().metadata.total_sessions, 0);
    }

    #[tokio::test]
    async fn failing_cache_keeps_in_memory_state_usable() {
        let cache = MemorySource::new(SourceKind::Cache);
        cache.set_unavailable(true);
        let mut board = board_with(&cache, None);

        let update = board.add_participant("Alice").await.unwrap();
        assert_eq!(update.status, SyncStatus::Error);

        let again = board.increment(update.participant.id).await.unwrap();
        assert_eq!(again.participant.count, 1);
        assert_eq!(board.store().totals().total_fine, 1_000);
    }
}
