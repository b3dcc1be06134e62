use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tally_core::sources::SaveResponse;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),
    #[error("No data found")]
    NoData,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NoData | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = SaveResponse {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
