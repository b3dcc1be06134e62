//! Sync status reported after every load and save.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which durability tier the last load or save reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// The remote store accepted the write or served the read.
    Synced,
    /// Only the local cache (or static snapshot) was involved.
    Local,
    /// The local cache itself failed.
    Error,
    /// Nothing was found on load.
    Empty,
}

impl SyncStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Local => "local",
            Self::Error => "error",
            Self::Empty => "empty",
        }
    }

    /// Human readable indicator text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Synced => "Data synced",
            Self::Local => "Local data (offline)",
            Self::Error => "Sync error",
            Self::Empty => "No data",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
