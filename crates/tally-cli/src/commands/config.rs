use std::path::{Path, PathBuf};

use tally_core::config::ClientConfig;
use tally_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::commands::common::Context;
use crate::config_file::{default_cache_path, load_from_path, save_to_path};
use crate::error::CliError;

/// `resolve_context` is only invoked by `show`, so a broken config file can
/// still be repaired with `set` or `init --force`.
pub fn run_config(
    command: ConfigCommands,
    config_path: &Path,
    resolve_context: impl FnOnce() -> Result<Context, CliError>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { json } => {
            let context = resolve_context()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&context.config)?);
            } else {
                print_config(&context.config, config_path);
            }
            Ok(())
        }
        ConfigCommands::Set {
            api_url,
            static_snapshot,
            cache_path,
            local_authoritative,
            request_timeout_secs,
        } => {
            let updates = ConfigUpdates {
                api_url,
                static_snapshot,
                cache_path,
                local_authoritative,
                request_timeout_secs,
            };
            let config = run_config_set(config_path, updates)?;
            println!("Updated {}", config_path.display());
            print_config(&config, config_path);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            run_config_init(config_path, force)?;
            println!("Wrote {}", config_path.display());
            Ok(())
        }
    }
}

/// Values passed to `config set`; an empty string unsets a field.
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdates {
    pub api_url: Option<String>,
    pub static_snapshot: Option<String>,
    pub cache_path: Option<String>,
    pub local_authoritative: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

pub fn run_config_set(config_path: &Path, updates: ConfigUpdates) -> Result<ClientConfig, CliError> {
    let mut config = load_from_path(config_path)?;

    if let Some(url) = updates.api_url {
        config.api_base_url = normalize_text_option(Some(url));
    }
    if let Some(location) = updates.static_snapshot {
        config.static_snapshot = normalize_text_option(Some(location));
    }
    if let Some(path) = updates.cache_path {
        config.cache_path = normalize_text_option(Some(path)).map(PathBuf::from);
    }
    if let Some(flag) = updates.local_authoritative {
        config.local_authoritative = flag;
    }
    if let Some(secs) = updates.request_timeout_secs {
        config.request_timeout_secs = (secs > 0).then_some(secs);
    }

    let config = config.normalized()?;
    save_to_path(&config, config_path)?;
    Ok(config)
}

pub fn run_config_init(config_path: &Path, force: bool) -> Result<ClientConfig, CliError> {
    if config_path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        )));
    }

    let config = ClientConfig {
        cache_path: Some(default_cache_path()),
        ..ClientConfig::default()
    };
    save_to_path(&config, config_path)?;
    Ok(config)
}

fn print_config(config: &ClientConfig, config_path: &Path) {
    println!("Config file:          {}", config_path.display());
    println!(
        "API URL:              {}",
        config.api_base_url.as_deref().unwrap_or("(none)")
    );
    println!(
        "Static snapshot:      {}",
        config.static_snapshot.as_deref().unwrap_or("(none)")
    );
    println!(
        "Cache path:           {}",
        config
            .cache_path
            .as_ref()
            .map_or_else(|| "(default)".to_string(), |path| path.display().to_string())
    );
    println!("Local authoritative:  {}", config.local_authoritative);
    println!(
        "Request timeout:      {}",
        config
            .request_timeout_secs
            .map_or_else(|| "(none)".to_string(), |secs| format!("{secs}s"))
    );
}
