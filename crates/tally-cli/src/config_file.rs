//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use tally_core::config::ClientConfig;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
const CACHE_FILE_NAME: &str = "local-storage.json";

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("tally").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally")
        .join(CACHE_FILE_NAME)
}

/// Missing files read as the default config.
pub fn load_from_path(path: &Path) -> Result<ClientConfig, CliError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|error| {
        CliError::Config(format!(
            "Failed to read config at {}: {}",
            path.display(),
            error
        ))
    })?;
    serde_json::from_str::<ClientConfig>(&raw).map_err(|error| {
        CliError::Config(format!(
            "Failed to parse config at {}: {}",
            path.display(),
            error
        ))
    })
}

pub fn save_to_path(config: &ClientConfig, path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|error| {
            CliError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                error
            ))
        })?;
    }

    let serialized = serde_json::to_string_pretty(config)?;
    std::fs::write(path, serialized).map_err(|error| {
        CliError::Config(format!(
            "Failed to write config at {}: {}",
            path.display(),
            error
        ))
    })
}
