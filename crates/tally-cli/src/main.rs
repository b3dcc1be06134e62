//! Tally CLI - keep the board from the terminal
//!
//! Every command loads the board through the same fallback chain the other
//! clients use (remote store, static snapshot, local cache) and saves after
//! each change.

mod cli;
mod commands;
mod config_file;
mod error;


use std::collections::HashMap;
use std::path::Path;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::bump::{run_bump, Bump};
use crate::commands::common::{Context, SourceOverrides};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::dark_mode::run_dark_mode;
use crate::commands::export::{run_backup, run_export};
use crate::commands::list::run_list;
use crate::commands::log::run_log;
use crate::commands::profile::run_profile;
use crate::commands::ranking::run_ranking;
use crate::commands::remove::run_remove;
use crate::commands::reset::run_reset;
use crate::commands::stats::run_stats;
use crate::commands::status::run_status;
use crate::config_file::{default_config_path, load_from_path};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "tally=info"
        .parse()
        .map_err(|error| CliError::Config(format!("invalid log directive: {error}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let overrides = SourceOverrides {
        api_url: cli.api_url,
        static_snapshot: cli.static_snapshot,
        cache_path: cli.cache_path,
    };

    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(CliError::Io)?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => {
            let config_path = default_config_path()?;
            run_config(command, &config_path, || {
                resolve_context(&config_path, overrides)
            })
        }
        command => {
            let context = resolve_context(&default_config_path()?, overrides)?;
            run_board_command(command, &context).await
        }
    }
}

async fn run_board_command(command: Commands, context: &Context) -> Result<(), CliError> {
    match command {
        Commands::Add { name } => run_add(&name, context).await,
        Commands::Inc { participant } => run_bump(&participant, Bump::Up, context).await,
        Commands::Dec { participant } => run_bump(&participant, Bump::Down, context).await,
        Commands::Remove { participant, yes } => run_remove(&participant, yes, context).await,
        Commands::List { json } => run_list(json, context).await,
        Commands::Ranking { json } => run_ranking(json, context).await,
        Commands::Stats { json } => run_stats(json, context).await,
        Commands::Log {
            participant,
            limit,
            json,
        } => run_log(&participant, limit, json, context).await,
        Commands::DarkMode => run_dark_mode(context).await,
        Commands::Reset { yes } => run_reset(yes, context).await,
        Commands::Status => run_status(context).await,
        Commands::Export { format, output } => run_export(format, output.as_deref(), context).await,
        Commands::Backup { output } => run_backup(output.as_deref(), context).await,
        Commands::Profile { command } => run_profile(command, context).await,
        Commands::Completions { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn resolve_context(config_path: &Path, overrides: SourceOverrides) -> Result<Context, CliError> {
    let file_config = load_from_path(config_path)?;
    let env: HashMap<String, String> = std::env::vars().collect();
    Context::resolve(file_config, |name| env.get(name).cloned(), overrides)
}
