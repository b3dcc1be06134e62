//! tally-core - Core library for Tally
//!
//! This crate contains the shared models, the in-memory participant store,
//! the snapshot sources (local cache, remote store, static snapshot) and the
//! reconciler that picks between them. It is used by the CLI and the API.

pub mod board;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reconciler;
pub mod sources;
pub mod state;
pub mod store;
pub mod util;

pub use board::{Board, BoardUpdate};
pub use error::{Error, Result};
pub use models::{
    ActivityAction, ActivityLog, ActivityLogEntry, ActorProfile, LogValue, Participant,
    ParticipantId, Snapshot,
};
pub use reconciler::{LoadOutcome, Reconciler};
pub use state::SyncStatus;
pub use store::{ParticipantStore, StoreError, Totals, UNIT_FINE};
