//! Remote store client for the `tally-api` backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{SnapshotSource, SourceError, SourceKind, SourceResult};
use crate::models::Snapshot;
use crate::util::{compact_text, is_http_url, normalize_text_option};

pub const LOAD_PATH: &str = "/api/load-data";
pub const SAVE_PATH: &str = "/api/save-data";

/// Body returned by `POST /api/save-data` (and by failed loads).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    /// Create a client for `base_url`. No timeout is applied unless given.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> SourceResult<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl SnapshotSource for RemoteStore {
    fn kind(&self) -> SourceKind {
        SourceKind::Remote
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn load(&self) -> SourceResult<Snapshot> {
        let response = self
            .client
            .get(self.url(LOAD_PATH))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status(parse_api_error(status, &body)));
        }

        Ok(Snapshot::from_json(&body)?)
    }

    async fn save(&self, snapshot: &Snapshot) -> SourceResult<()> {
        let response = self
            .client
            .post(self.url(SAVE_PATH))
            .json(snapshot)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status(parse_api_error(status, &body)));
        }

        let result = serde_json::from_str::<SaveResponse>(&body)?;
        if result.success {
            Ok(())
        } else {
            Err(SourceError::Rejected(result.message))
        }
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<SaveResponse>(body) {
        if !payload.message.trim().is_empty() {
            return format!("{} ({})", payload.message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> SourceResult<String> {
    let base_url = normalize_text_option(Some(raw))
        .ok_or_else(|| SourceError::InvalidEndpoint("base URL must not be empty".to_string()))?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(SourceError::InvalidEndpoint(
            "base URL must include http:// or https://".to_string(),
        ))
    }
}
