//! Shared utility functions used across multiple modules.

use chrono::{DateTime, Local, Utc};

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Day/month/year label in local time, e.g. `18/10/2026`.
pub fn format_display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-d/%-m/%Y").to_string()
}

/// Hour.minute.second label in local time, e.g. `09.05.07`.
pub fn format_display_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H.%M.%S").to_string()
}
