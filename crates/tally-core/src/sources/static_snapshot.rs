//! Read-only static snapshot (`data.json`) fetched over HTTP or from disk.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use super::{SnapshotSource, SourceError, SourceKind, SourceResult};
use crate::models::Snapshot;
use crate::util::{compact_text, is_http_url};

/// Where the static snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticLocation {
    Url(String),
    File(PathBuf),
}

impl StaticLocation {
    /// `http(s)://` values are URLs, anything else is a path.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if is_http_url(raw) {
            Some(Self::Url(raw.to_string()))
        } else {
            Some(Self::File(PathBuf::from(raw)))
        }
    }
}

impl fmt::Display for StaticLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticSnapshot {
    location: StaticLocation,
    client: reqwest::Client,
}

impl StaticSnapshot {
    pub fn new(location: StaticLocation, timeout: Option<Duration>) -> SourceResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            location,
            client: builder.build()?,
        })
    }

    pub const fn location(&self) -> &StaticLocation {
        &self.location
    }

    async fn fetch(&self, url: &str) -> SourceResult<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(SourceError::Status(format!(
                "HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )))
        }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshot {
    fn kind(&self) -> SourceKind {
        SourceKind::Static
    }

    fn describe(&self) -> String {
        self.location.to_string()
    }

    async fn load(&self) -> SourceResult<Snapshot> {
        let raw = match &self.location {
            StaticLocation::Url(url) => self.fetch(url).await?,
            StaticLocation::File(path) => tokio::fs::read_to_string(path).await?,
        };
        Ok(Snapshot::from_json(&raw)?)
    }

    async fn save(&self, _snapshot: &Snapshot) -> SourceResult<()> {
        Err(SourceError::ReadOnly)
    }
}
