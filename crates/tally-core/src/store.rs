//! In-memory participant store and its derived views.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ActivityAction, ActivityLogEntry, LogValue, Participant, ParticipantId};

/// Fine charged per counted item.
pub const UNIT_FINE: u64 = 1_000;

/// Validation failures. The store is left unchanged when one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Participant name cannot be empty")]
    EmptyName,
    #[error("Participant \"{0}\" already exists")]
    DuplicateName(String),
    #[error("{0} is already at zero")]
    CountAtZero(String),
    #[error("Participant not found: {0}")]
    NotFound(String),
}

/// Hands out strictly increasing millisecond ids.
#[derive(Debug, Clone, Copy, Default)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn next_at(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}

/// Podium decoration for the top three of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    #[must_use]
    pub const fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
        }
    }
}

/// One row of the ranking view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedParticipant<'a> {
    /// 1-based position
    pub rank: usize,
    pub medal: Option<Medal>,
    pub participant: &'a Participant,
}

/// Aggregate numbers shown next to the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Totals {
    pub participants: usize,
    pub total_count: u64,
    pub total_fine: u64,
}

/// Ordered participant list (insertion order) with validated mutations.
#[derive(Debug, Clone, Default)]
pub struct ParticipantStore {
    participants: Vec<Participant>,
    ids: IdGenerator,
}

impl ParticipantStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded participants, keeping their order.
    #[must_use]
    pub fn from_participants(participants: Vec<Participant>) -> Self {
        let mut store = Self::new();
        store.replace(participants);
        store
    }

    /// Swap in a new participant list (used after a load).
    pub fn replace(&mut self, participants: Vec<Participant>) {
        for participant in &participants {
            self.ids.observe(participant.id.get());
            if let Some(max_id) = participant.activity_log.max_id() {
                self.ids.observe(max_id);
            }
        }
        self.participants = participants;
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|participant| participant.id == id)
    }

    /// Look a participant up by numeric id or, failing that, by name.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&Participant> {
        if let Ok(id) = query.parse::<ParticipantId>() {
            if let Some(participant) = self.get(id) {
                return Some(participant);
            }
        }
        self.participants
            .iter()
            .find(|participant| participant.has_name(query))
    }

    pub fn add(&mut self, name: &str, actor: &str) -> Result<&Participant, StoreError> {
        self.add_at(name, actor, Utc::now())
    }

    fn add_at(
        &mut self,
        name: &str,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<&Participant, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.participants.iter().any(|p| p.has_name(name)) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }

        let id = ParticipantId::new(self.ids.next_at(now));
        let mut participant = Participant::new(id, name, now);
        participant.activity_log.record(ActivityLogEntry::new(
            self.ids.next_at(now),
            ActivityAction::Added,
            None,
            Some(LogValue::Text(name.to_string())),
            actor,
            now,
        ));

        tracing::debug!(participant = %id, "Added participant");
        self.participants.push(participant);
        Ok(&self.participants[self.participants.len() - 1])
    }

    pub fn increment(&mut self, id: ParticipantId, actor: &str) -> Result<&Participant, StoreError> {
        self.adjust(id, actor, ActivityAction::Incremented, Utc::now())
    }

    pub fn decrement(&mut self, id: ParticipantId, actor: &str) -> Result<&Participant, StoreError> {
        self.adjust(id, actor, ActivityAction::Decremented, Utc::now())
    }

    fn adjust(
        &mut self,
        id: ParticipantId,
        actor: &str,
        action: ActivityAction,
        now: DateTime<Utc>,
    ) -> Result<&Participant, StoreError> {
        let index = self.index_of(id)?;
        let old_count = self.participants[index].count;
        let new_count = match action {
            ActivityAction::Decremented => {
                if old_count == 0 {
                    return Err(StoreError::CountAtZero(
                        self.participants[index].name.clone(),
                    ));
                }
                old_count - 1
            }
            _ => old_count.saturating_add(1),
        };

        let entry_id = self.ids.next_at(now);
        let participant = &mut self.participants[index];
        participant.count = new_count;
        participant.activity_log.record(ActivityLogEntry::new(
            entry_id,
            action,
            Some(LogValue::Count(old_count)),
            Some(LogValue::Count(new_count)),
            actor,
            now,
        ));
        Ok(&*participant)
    }

    /// Record the removal in the participant's log, then drop it.
    pub fn remove(&mut self, id: ParticipantId, actor: &str) -> Result<Participant, StoreError> {
        let index = self.index_of(id)?;
        let now = Utc::now();
        let entry_id = self.ids.next_at(now);

        let mut participant = self.participants.remove(index);
        let name = participant.name.clone();
        participant.activity_log.record(ActivityLogEntry::new(
            entry_id,
            ActivityAction::Removed,
            Some(LogValue::Text(name)),
            None,
            actor,
            now,
        ));
        tracing::debug!(participant = %id, "Removed participant");
        Ok(participant)
    }

    /// Drop every participant.
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Participants ordered by count, highest first. Ties keep insertion order.
    #[must_use]
    pub fn ranking(&self) -> Vec<RankedParticipant<'_>> {
        let mut sorted = self.participants.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
            .into_iter()
            .enumerate()
            .map(|(index, participant)| RankedParticipant {
                rank: index + 1,
                medal: Medal::for_rank(index + 1),
                participant,
            })
            .collect()
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        let total_count = self
            .participants
            .iter()
            .fold(0_u64, |sum, participant| sum.saturating_add(participant.count));
        Totals {
            participants: self.participants.len(),
            total_count,
            total_fine: total_count.saturating_mul(UNIT_FINE),
        }
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, StoreError> {
        self.participants
            .iter()
            .position(|participant| participant.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
