//! Application snapshot, the unit of persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Participant;

pub const SNAPSHOT_VERSION: &str = "1.0.0";
pub const SNAPSHOT_DESCRIPTION: &str = "Tally board database";
pub const BACKUP_DESCRIPTION: &str = "Tally board backup";

/// Display preferences stored with the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSettings {
    #[serde(default)]
    pub is_dark_mode: bool,
    /// Set on every write
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            last_updated: None,
            version: default_version(),
        }
    }
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

/// Informational metadata, no invariants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_sessions: usize,
    #[serde(default)]
    pub description: String,
}

/// Full application state written and read as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct Snapshot {
    pub participants: Vec<Participant>,
    pub settings: SnapshotSettings,
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Build a fresh snapshot of the current state.
    #[must_use]
    pub fn capture(participants: &[Participant], is_dark_mode: bool, now: DateTime<Utc>) -> Self {
        Self::capture_with_description(participants, is_dark_mode, now, SNAPSHOT_DESCRIPTION)
    }

    #[must_use]
    pub fn capture_with_description(
        participants: &[Participant],
        is_dark_mode: bool,
        now: DateTime<Utc>,
        description: &str,
    ) -> Self {
        Self {
            participants: participants.to_vec(),
            settings: SnapshotSettings {
                is_dark_mode,
                last_updated: Some(now),
                version: SNAPSHOT_VERSION.to_string(),
            },
            metadata: SnapshotMetadata {
                created: Some(now),
                total_sessions: participants.len(),
                description: description.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.settings.is_dark_mode
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Serialize to pretty JSON, the on-disk format of the backend file.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Lenient wire shape: nulls and missing sections fall back to defaults and a
/// legacy top-level `isDarkMode` is honoured when settings omit it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    participants: Option<Vec<Participant>>,
    #[serde(default)]
    settings: Option<RawSettings>,
    #[serde(default)]
    metadata: Option<SnapshotMetadata>,
    #[serde(default)]
    is_dark_mode: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    #[serde(default)]
    is_dark_mode: Option<bool>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    version: Option<String>,
}

impl From<RawSnapshot> for Snapshot {
    fn from(raw: RawSnapshot) -> Self {
        let (settings_dark_mode, last_updated, version) = raw
            .settings
            .map(|settings| {
                (
                    settings.is_dark_mode,
                    settings.last_updated,
                    settings.version,
                )
            })
            .unwrap_or_default();

        Self {
            participants: raw.participants.unwrap_or_default(),
            settings: SnapshotSettings {
                is_dark_mode: settings_dark_mode.or(raw.is_dark_mode).unwrap_or(false),
                last_updated,
                version: version.unwrap_or_else(default_version),
            },
            metadata: raw.metadata.unwrap_or_default(),
        }
    }
}
