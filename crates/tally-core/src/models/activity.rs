//! Activity log model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{format_display_date, format_display_time};

/// Maximum number of entries kept per participant.
pub const ACTIVITY_LOG_CAPACITY: usize = 50;

/// What happened to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Added,
    Incremented,
    Decremented,
    Removed,
}

impl ActivityAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Incremented => "incremented",
            Self::Decremented => "decremented",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the mutated field: a count, or the participant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Count(u64),
    Text(String),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A single immutable activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// Unique timestamp-derived identifier
    pub id: i64,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    pub action: ActivityAction,
    pub old_value: Option<LogValue>,
    pub new_value: Option<LogValue>,
    /// Profile name or device fingerprint of whoever made the change
    #[serde(rename = "device")]
    pub actor_label: String,
    /// Local display date captured at creation
    #[serde(default)]
    pub date: String,
    /// Local display time captured at creation
    #[serde(default)]
    pub time: String,
}

impl ActivityLogEntry {
    #[must_use]
    pub fn new(
        id: i64,
        action: ActivityAction,
        old_value: Option<LogValue>,
        new_value: Option<LogValue>,
        actor_label: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            timestamp: at,
            action,
            old_value,
            new_value,
            actor_label: actor_label.into(),
            date: format_display_date(at),
            time: format_display_time(at),
        }
    }
}

/// Newest-first log, truncated at [`ACTIVITY_LOG_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog(Vec<ActivityLogEntry>);

impl ActivityLog {
    /// Insert at the front and evict the oldest entries past capacity.
    pub fn record(&mut self, entry: ActivityLogEntry) {
        self.0.insert(0, entry);
        self.0.truncate(ACTIVITY_LOG_CAPACITY);
    }

    #[must_use]
    pub fn entries(&self) -> &[ActivityLogEntry] {
        &self.0
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ActivityLogEntry> {
        self.0.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityLogEntry> {
        self.0.iter()
    }

    /// Highest entry id, used to seed id generation after a load.
    #[must_use]
    pub fn max_id(&self) -> Option<i64> {
        self.0.iter().map(|entry| entry.id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64) -> ActivityLogEntry {
        ActivityLogEntry::new(
            id,
            ActivityAction::Incremented,
            Some(LogValue::Count(0)),
            Some(LogValue::Count(1)),
            "tester",
            Utc::now(),
        )
    }

    #[test]
    fn record_keeps_newest_first_and_caps_length() {
        let mut log = ActivityLog::default();
        for id in 1..=60 {
            log.record(entry(id));
        }

        assert_eq!(log.len(), ACTIVITY_LOG_CAPACITY);
        assert_eq!(log.latest().map(|entry| entry.id), Some(60));
        assert_eq!(log.entries().last().map(|entry| entry.id), Some(11));
    }

    #[test]
    fn log_value_accepts_numbers_strings_and_null() {
        let parsed: Vec<Option<LogValue>> =
            serde_json::from_str(r#"[3, "Alice", null]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Some(LogValue::Count(3)),
                Some(LogValue::Text("Alice".to_string())),
                None
            ]
        );
    }

    #[test]
    fn entry_serializes_actor_as_device() {
        let json = serde_json::to_value(entry(7)).unwrap();
        assert_eq!(json["device"], "tester");
        assert_eq!(json["action"], "incremented");
        assert_eq!(json["oldValue"], 0);
        assert_eq!(json["newValue"], 1);
    }
}
