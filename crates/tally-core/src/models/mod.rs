//! Data models for Tally

mod activity;
mod participant;
mod profile;
mod snapshot;

pub use activity::{ActivityAction, ActivityLog, ActivityLogEntry, LogValue, ACTIVITY_LOG_CAPACITY};
pub use participant::{Participant, ParticipantId};
pub use profile::{device_fingerprint, validate_profile_name, ActorProfile};
pub use snapshot::{
    Snapshot, SnapshotMetadata, SnapshotSettings, BACKUP_DESCRIPTION, SNAPSHOT_DESCRIPTION,
    SNAPSHOT_VERSION,
};
