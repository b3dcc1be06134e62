//! Error types for tally-core

use thiserror::Error;

use crate::sources::SourceError;
use crate::store::StoreError;

/// Result type alias using tally-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tally-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Participant store validation error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Snapshot source error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}
