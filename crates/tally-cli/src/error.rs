use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] tally_core::Error),
    #[error(transparent)]
    Store(#[from] tally_core::StoreError),
    #[error(transparent)]
    Source(#[from] tally_core::sources::SourceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No participant name provided")]
    EmptyName,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Refusing to {0} without confirmation; pass --yes to proceed")]
    ConfirmationRequired(&'static str),
}
