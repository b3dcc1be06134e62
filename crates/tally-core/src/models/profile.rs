//! Actor profile used to label activity log entries.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static PROFILE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("Invalid regex"));

/// Who is operating this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorProfile {
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub device_info: String,
}

impl ActorProfile {
    /// Create a profile after validating the name.
    pub fn new(name: &str) -> Result<Self> {
        let name = validate_profile_name(name)?;
        Ok(Self {
            name,
            created_at: Utc::now(),
            device_info: device_fingerprint(),
        })
    }

    /// Label written into activity log entries.
    #[must_use]
    pub fn actor_label(profile: Option<&Self>) -> String {
        profile.map_or_else(device_fingerprint, |profile| profile.name.clone())
    }
}

/// Profile names are at least two characters of letters and spaces.
pub fn validate_profile_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(Error::InvalidInput(
            "profile name must be at least 2 characters".to_string(),
        ));
    }
    if !PROFILE_NAME_PATTERN.is_match(name) {
        return Err(Error::InvalidInput(
            "profile name may only contain letters and spaces".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Coarse description of the running device, e.g. `linux/x86_64`.
#[must_use]
pub fn device_fingerprint() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}
