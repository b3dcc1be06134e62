use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tally_core::sources::{SaveResponse, DEFAULT_QUOTA_BYTES};
use tally_core::Snapshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::storage::{repository_from_config, SnapshotRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    repository: Arc<dyn SnapshotRepository>,
}

impl AppState {
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        let repository: Arc<dyn SnapshotRepository> = Arc::from(repository_from_config(&config));
        Self { config, repository }
    }

    pub fn with_repository(config: Arc<AppConfig>, repository: Arc<dyn SnapshotRepository>) -> Self {
        Self { config, repository }
    }
}

/// Largest accepted save body; matches what a client cache can hold.
pub const MAX_SNAPSHOT_BYTES: usize = DEFAULT_QUOTA_BYTES;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/data.json", get(load_data))
        .route("/api/load-data", get(load_data))
        .route("/api/save-data", post(save_data))
        .layer(DefaultBodyLimit::max(MAX_SNAPSHOT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    storage: String,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        storage: state.repository.describe(),
    })
}

async fn load_data(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    match state.repository.load().await {
        Ok(Some(snapshot)) => {
            tracing::debug!(
                participants = snapshot.participants.len(),
                "Served board snapshot"
            );
            Ok(Json(snapshot))
        }
        Ok(None) => {
            tracing::warn!("Load requested before any data was saved");
            Err(AppError::NoData)
        }
        Err(error) => {
            tracing::error!("Failed to read board snapshot: {error}");
            Err(error.into())
        }
    }
}

async fn save_data(
    State(state): State<AppState>,
    payload: Result<Json<Snapshot>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(snapshot) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Rejected oversized snapshot");
            AppError::PayloadTooLarge(MAX_SNAPSHOT_BYTES)
        } else {
            AppError::InvalidPayload(rejection.body_text())
        }
    })?;

    if let Err(error) = state.repository.save(&snapshot).await {
        tracing::error!("Failed to write board snapshot: {error}");
        return Err(error.into());
    }

    tracing::info!(
        participants = snapshot.participants.len(),
        storage = %state.repository.describe(),
        "Saved board snapshot"
    );
    Ok(Json(SaveResponse {
        success: true,
        message: "Data saved successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use tally_core::{Participant, ParticipantId};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppEnvironment, StorageMode};
    use crate::storage::{JsonFileRepository, MemoryRepository};

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            data_file: "data.json".into(),
            storage: StorageMode::Memory,
            environment: AppEnvironment::Development,
        })
    }

    fn app_with(repository: Arc<dyn SnapshotRepository>) -> Router {
        app_router(AppState::with_repository(test_config(), repository))
    }

    fn sample_body() -> String {
        let mut alice = Participant::new(ParticipantId::new(1), "Alice", Utc::now());
        alice.count = 3;
        Snapshot::capture(&[alice], true, Utc::now())
            .to_json_pretty()
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn save_request(body: impl Into<Body>) -> Request<Body> {
        Request::post("/api/save-data")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn load_without_data_is_500() {
        let response = app_with(Arc::new(MemoryRepository::default()))
            .oneshot(Request::get("/api/load-data").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let app = app_with(Arc::new(MemoryRepository::default()));

        let response = app.clone().oneshot(save_request(sample_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Data saved successfully");

        let response = app
            .oneshot(Request::get("/api/load-data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["participants"][0]["name"], "Alice");
        assert_eq!(json["participants"][0]["swearCount"], 3);
        assert_eq!(json["settings"]["isDarkMode"], true);
    }

    #[tokio::test]
    async fn malformed_body_is_422() {
        let response = app_with(Arc::new(MemoryRepository::default()))
            .oneshot(save_request("not-json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn large_board_within_cache_quota_is_accepted() {
        let mut alice = Participant::new(ParticipantId::new(1), "Alice", Utc::now());
        alice.name = "A".repeat(3 * 1024 * 1024);
        let body = serde_json::to_string(&Snapshot::capture(&[alice], false, Utc::now())).unwrap();
        assert!(body.len() > 2 * 1024 * 1024);

        let response = app_with(Arc::new(MemoryRepository::default()))
            .oneshot(save_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn body_over_cache_quota_is_413() {
        let body = format!(r#"{{"participants":[],"pad":"{}"}}"#, "x".repeat(MAX_SNAPSHOT_BYTES));

        let response = app_with(Arc::new(MemoryRepository::default()))
            .oneshot(save_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn write_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the target file makes the rename fail.
        let target = dir.path().join("data.json");
        std::fs::create_dir(&target).unwrap();
        let app = app_with(Arc::new(JsonFileRepository::new(target)));

        let response = app.oneshot(save_request(sample_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn static_path_serves_saved_snapshot() {
        let repository: Arc<dyn SnapshotRepository> = Arc::new(MemoryRepository::default());
        let app = app_with(repository.clone());
        app.clone().oneshot(save_request(sample_body())).await.unwrap();

        let response = app
            .oneshot(Request::get("/data.json").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["metadata"]["totalSessions"], 1);
    }

    #[tokio::test]
    async fn healthz_reports_storage() {
        let response = app_with(Arc::new(MemoryRepository::default()))
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage"], "memory");
    }
}
