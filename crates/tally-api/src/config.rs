use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_DATA_FILE: &str = "data.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where snapshots are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    File,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub storage: StorageMode,
    pub environment: AppEnvironment,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = value_or_default(&lookup, "TALLY_API_BIND_ADDR", DEFAULT_BIND_ADDR);
        let mut bind_addr = raw_addr.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Invalid(format!(
                "TALLY_API_BIND_ADDR must be a socket address like {DEFAULT_BIND_ADDR}, got {raw_addr}"
            ))
        })?;

        // Hosting platforms inject PORT; it wins over the configured port.
        if let Some(port) = optional_trimmed(&lookup, "PORT") {
            let port = port.parse::<u16>().map_err(|_| {
                ConfigError::Invalid("PORT must be an integer in [0, 65535]".to_string())
            })?;
            bind_addr.set_port(port);
        }

        let data_file = PathBuf::from(value_or_default(
            &lookup,
            "TALLY_DATA_FILE",
            DEFAULT_DATA_FILE,
        ));

        let storage = match value_or_default(&lookup, "TALLY_STORAGE", "file")
            .to_ascii_lowercase()
            .as_str()
        {
            "file" => StorageMode::File,
            "memory" => StorageMode::Memory,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "TALLY_STORAGE must be file or memory, got {other}"
                )))
            }
        };

        let environment = match value_or_default(&lookup, "TALLY_ENV", "development")
            .to_ascii_lowercase()
            .as_str()
        {
            "development" | "dev" => AppEnvironment::Development,
            "production" | "prod" => AppEnvironment::Production,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "TALLY_ENV must be development or production, got {other}"
                )))
            }
        };

        Ok(Self {
            bind_addr,
            data_file,
            storage,
            environment,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config_from(map: &HashMap<&str, &str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = config_from(&HashMap::new()).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.storage, StorageMode::File);
        assert_eq!(config.environment, AppEnvironment::Development);
    }

    #[test]
    fn port_overrides_bind_port() {
        let map = HashMap::from([("TALLY_API_BIND_ADDR", "0.0.0.0:8080"), ("PORT", " 4000 ")]);
        let config = config_from(&map).unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:4000");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let map = HashMap::from([("PORT", "seventy")]);
        let error = config_from(&map).unwrap_err();

        assert!(error.to_string().contains("PORT"));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let map = HashMap::from([("TALLY_API_BIND_ADDR", "localhost")]);
        assert!(config_from(&map).is_err());
    }

    #[test]
    fn storage_and_environment_are_parsed() {
        let map = HashMap::from([("TALLY_STORAGE", "Memory"), ("TALLY_ENV", "production")]);
        let config = config_from(&map).unwrap();

        assert_eq!(config.storage, StorageMode::Memory);
        assert!(config.environment.is_production());

        let bad = HashMap::from([("TALLY_STORAGE", "s3")]);
        assert!(config_from(&bad).is_err());
    }
}
