//! Snapshot sources behind one capability interface.
//!
//! The local cache, the remote store and the static snapshot all implement
//! [`SnapshotSource`], so the reconciler can walk them in precedence order
//! without caring which concrete tier it is talking to.

mod cache;
#[cfg(test)]
mod memory;
mod remote;
mod static_snapshot;

use async_trait::async_trait;
use thiserror::Error;

pub use cache::{KeyValueStore, LocalCache, DEFAULT_QUOTA_BYTES, PROFILE_KEY, SNAPSHOT_KEY};
#[cfg(test)]
pub(crate) use memory::MemorySource;
pub use remote::{RemoteStore, SaveResponse};
pub use static_snapshot::{StaticLocation, StaticSnapshot};

#[cfg(test)]
pub(crate) use remote::tests::serve_canned;

use crate::models::Snapshot;
use crate::state::SyncStatus;

/// Which durability tier a source represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Remote,
    Static,
    Cache,
}

impl SourceKind {
    /// Status reported when a load from this tier wins.
    #[must_use]
    pub const fn loaded_status(self) -> SyncStatus {
        match self {
            Self::Remote => SyncStatus::Synced,
            Self::Static | Self::Cache => SyncStatus::Local,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Static => "static",
            Self::Cache => "cache",
        }
    }
}

/// Reasons a source could not serve a load or accept a save.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Source responded with {0}")]
    Status(String),
    #[error("Save rejected: {0}")]
    Rejected(String),
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Source is read-only")]
    ReadOnly,
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("No data stored")]
    Missing,
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Uniform load/save capability shared by every tier.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Short description for logs (URL or path).
    fn describe(&self) -> String;

    async fn load(&self) -> SourceResult<Snapshot>;

    async fn save(&self, snapshot: &Snapshot) -> SourceResult<()>;
}
