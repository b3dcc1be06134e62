//! Client configuration.
//!
//! Provides a `ClientConfig` struct used by the CLI to decide which snapshot
//! sources exist and how the reconciler treats them.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reconciler::Reconciler;
use crate::sources::{LocalCache, RemoteStore, StaticLocation, StaticSnapshot};
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_API_URL: &str = "TALLY_API_URL";
pub const ENV_STATIC_SNAPSHOT: &str = "TALLY_STATIC_SNAPSHOT";
pub const ENV_CACHE_PATH: &str = "TALLY_CACHE_PATH";
pub const ENV_LOCAL_AUTHORITATIVE: &str = "TALLY_LOCAL_AUTHORITATIVE";

const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Where the client reads and writes snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the remote store (`tally-api`)
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// URL or path of the read-only `data.json`
    #[serde(default)]
    pub static_snapshot: Option<String>,
    /// File backing the local cache
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    /// Treat cache-only saves as `synced`
    #[serde(default)]
    pub local_authoritative: bool,
    /// Optional per-request timeout; requests never time out when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Overlay environment values on top of this config.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = normalize_text_option(lookup(ENV_API_URL)) {
            self.api_base_url = Some(url);
        }
        if let Some(location) = normalize_text_option(lookup(ENV_STATIC_SNAPSHOT)) {
            self.static_snapshot = Some(location);
        }
        if let Some(path) = normalize_text_option(lookup(ENV_CACHE_PATH)) {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = normalize_text_option(lookup(ENV_LOCAL_AUTHORITATIVE)) {
            self.local_authoritative = matches!(
                flag.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    /// Trim values, drop empties and validate URLs.
    pub fn normalized(mut self) -> Result<Self> {
        self.api_base_url = normalize_text_option(self.api_base_url)
            .map(|url| url.trim_end_matches('/').to_string());
        if let Some(url) = self.api_base_url.as_deref() {
            if !is_http_url(url) {
                return Err(Error::InvalidInput(
                    "api_base_url must include http:// or https://".to_string(),
                ));
            }
        }

        self.static_snapshot = normalize_text_option(self.static_snapshot);
        self.cache_path = self
            .cache_path
            .filter(|path| !path.as_os_str().is_empty());

        if let Some(secs) = self.request_timeout_secs {
            if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&secs) {
                return Err(Error::InvalidInput(format!(
                    "request_timeout_secs must be in [1, {MAX_REQUEST_TIMEOUT_SECS}]"
                )));
            }
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn static_location(&self) -> Option<StaticLocation> {
        self.static_snapshot
            .as_deref()
            .and_then(StaticLocation::parse)
    }

    /// Assemble the reconciler for this configuration around `cache`.
    pub fn build_reconciler(&self, cache: LocalCache) -> Result<Reconciler> {
        let mut builder =
            Reconciler::builder(cache).local_authoritative(self.local_authoritative);

        if let Some(url) = normalize_text_option(self.api_base_url.clone()) {
            builder = builder.remote(RemoteStore::new(url, self.request_timeout())?);
        }
        if let Some(location) = self.static_location() {
            builder = builder.static_snapshot(StaticSnapshot::new(location, self.request_timeout())?);
        }

        Ok(builder.build())
    }
}
