use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Name the binary is installed under, shared by help output and completions.
pub const BIN_NAME: &str = env!("CARGO_BIN_NAME");

#[derive(Parser)]
#[command(name = BIN_NAME)]
#[command(about = "Keep score of who swore, and what it costs them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Remote store base URL (e.g. http://127.0.0.1:3001)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Read-only snapshot to fall back on (URL or path to data.json)
    #[arg(long, global = true, value_name = "URL|PATH")]
    pub static_snapshot: Option<String>,

    /// Path to the local cache file
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a participant
    #[command(alias = "new")]
    Add {
        /// Participant name
        name: Vec<String>,
    },
    /// Increment a participant's count
    #[command(alias = "up")]
    Inc {
        /// Participant id or name
        participant: String,
    },
    /// Decrement a participant's count
    #[command(alias = "down")]
    Dec {
        /// Participant id or name
        participant: String,
    },
    /// Remove a participant
    #[command(alias = "rm")]
    Remove {
        /// Participant id or name
        participant: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List participants in insertion order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show participants ordered by count
    Ranking {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show board totals
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a participant's activity log
    Log {
        /// Participant id or name
        participant: String,
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the dark-mode preference
    DarkMode,
    /// Remove every participant
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show sync status and configured sources
    Status,
    /// Export the ranking
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Write a full backup snapshot
    Backup {
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Manage the name written into activity logs
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for tally_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

impl From<CompletionShell> for clap_complete::Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
        }
    }
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Set the profile name
    Set {
        /// Name (letters and spaces, at least two characters)
        name: Vec<String>,
    },
    /// Show the current profile
    Show,
    /// Forget the profile; entries fall back to the device label
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update values in the config file (pass "" to unset)
    Set {
        /// Remote store base URL
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Static snapshot URL or path
        #[arg(long, value_name = "URL|PATH")]
        static_snapshot: Option<String>,
        /// Local cache path
        #[arg(long, value_name = "PATH")]
        cache_path: Option<String>,
        /// Report cache-only saves as synced
        #[arg(long, value_name = "BOOL")]
        local_authoritative: Option<bool>,
        /// Per-request timeout in seconds (0 to unset)
        #[arg(long, value_name = "SECS")]
        request_timeout_secs: Option<u64>,
    },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
