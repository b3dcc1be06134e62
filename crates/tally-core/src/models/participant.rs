//! Participant model

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ActivityLog;
use crate::store::UNIT_FINE;
use crate::util::format_display_date;

/// Participant identifier: the creation timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParticipantId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A tracked participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique identifier
    pub id: ParticipantId,
    /// Display name, unique ignoring case
    pub name: String,
    /// Current tally
    #[serde(rename = "swearCount", default)]
    pub count: u64,
    /// Localized join date, set once
    #[serde(default)]
    pub join_date: String,
    /// Newest-first activity history
    #[serde(default)]
    pub activity_log: ActivityLog,
}

impl Participant {
    /// Create a participant with a zero count and an empty log.
    #[must_use]
    pub fn new(id: ParticipantId, name: impl Into<String>, joined_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            count: 0,
            join_date: format_display_date(joined_at),
            activity_log: ActivityLog::default(),
        }
    }

    /// Fine owed for the current count.
    #[must_use]
    pub const fn fine(&self) -> u64 {
        self.count.saturating_mul(UNIT_FINE)
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
