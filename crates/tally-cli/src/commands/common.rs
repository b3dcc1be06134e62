use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tally_core::config::ClientConfig;
use tally_core::sources::{KeyValueStore, LocalCache};
use tally_core::store::RankedParticipant;
use tally_core::util::normalize_text_option;
use tally_core::{ActivityLogEntry, ActorProfile, Board, LogValue, Participant, SyncStatus};

use crate::config_file::default_cache_path;
use crate::error::CliError;

/// Source locations given on the command line; they win over env and file.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub api_url: Option<String>,
    pub static_snapshot: Option<String>,
    pub cache_path: Option<PathBuf>,
}

/// Effective configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ClientConfig,
}

impl Context {
    pub fn resolve(
        file_config: ClientConfig,
        lookup: impl Fn(&str) -> Option<String>,
        overrides: SourceOverrides,
    ) -> Result<Self, CliError> {
        let mut config = file_config.with_env_overrides(lookup);
        if let Some(url) = overrides.api_url {
            config.api_base_url = Some(url);
        }
        if let Some(location) = overrides.static_snapshot {
            config.static_snapshot = Some(location);
        }
        if let Some(path) = overrides.cache_path {
            config.cache_path = Some(path);
        }

        let mut config = config.normalized()?;
        if config.cache_path.is_none() {
            config.cache_path = Some(default_cache_path());
        }
        Ok(Self { config })
    }

    pub fn cache_path(&self) -> PathBuf {
        self.config
            .cache_path
            .clone()
            .unwrap_or_else(default_cache_path)
    }

    pub fn open_cache(&self) -> LocalCache {
        LocalCache::new(KeyValueStore::open(self.cache_path()))
    }

    /// Build the board and load the best available snapshot into it.
    pub async fn open_board(&self) -> Result<Board, CliError> {
        let cache = self.open_cache();
        let profile = match cache.load_profile().await {
            Ok(profile) => profile,
            Err(error) => {
                tracing::warn!("Failed to read profile from local cache: {error}");
                None
            }
        };
        let actor = ActorProfile::actor_label(profile.as_ref());

        let reconciler = self.config.build_reconciler(cache)?;
        let mut board = Board::new(reconciler, actor);
        let outcome = board.load().await;
        tracing::debug!(
            status = outcome.status.as_str(),
            source = outcome.source.map_or("none", |kind| kind.as_str()),
            participants = board.store().len(),
            "Loaded board"
        );
        Ok(board)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantListItem {
    pub id: i64,
    pub name: String,
    pub count: u64,
    pub fine: u64,
    pub join_date: String,
}

#[derive(Debug, Serialize)]
pub struct RankingItem {
    pub rank: usize,
    pub medal: Option<&'static str>,
    pub id: i64,
    pub name: String,
    pub count: u64,
    pub fine: u64,
}

pub fn participant_to_list_item(participant: &Participant) -> ParticipantListItem {
    ParticipantListItem {
        id: participant.id.get(),
        name: participant.name.clone(),
        count: participant.count,
        fine: participant.fine(),
        join_date: participant.join_date.clone(),
    }
}

pub fn ranking_to_item(row: &RankedParticipant<'_>) -> RankingItem {
    RankingItem {
        rank: row.rank,
        medal: row.medal.map(|medal| medal.symbol()),
        id: row.participant.id.get(),
        name: row.participant.name.clone(),
        count: row.participant.count,
        fine: row.participant.fine(),
    }
}

pub fn format_participant_line(participant: &Participant) -> String {
    format!(
        "{}  {}  count {}  fine {}",
        participant.id,
        participant.name,
        participant.count,
        participant.fine()
    )
}

pub fn format_ranking_line(row: &RankedParticipant<'_>) -> String {
    let medal = row.medal.map_or("  ", |medal| medal.symbol());
    format!(
        "{:>3}. {medal} {}  {} ({})",
        row.rank,
        row.participant.name,
        row.participant.count,
        row.participant.fine()
    )
}

pub fn format_log_line(entry: &ActivityLogEntry) -> String {
    format!(
        "{} {}  {:<11} {} -> {}  by {}",
        entry.date,
        entry.time,
        entry.action.as_str(),
        render_log_value(entry.old_value.as_ref()),
        render_log_value(entry.new_value.as_ref()),
        entry.actor_label
    )
}

fn render_log_value(value: Option<&LogValue>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}

pub fn format_update_line(participant: &Participant, status: SyncStatus) -> String {
    format!(
        "{}: {} (fine {}) [{status}]",
        participant.name,
        participant.count,
        participant.fine()
    )
}

/// Join positional words into one trimmed name.
pub fn join_name(parts: &[String]) -> Result<String, CliError> {
    normalize_text_option(Some(parts.join(" "))).ok_or(CliError::EmptyName)
}

/// Ask before a destructive action unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool, action: &'static str) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::ConfirmationRequired(action));
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Write `rendered` to `output`, or stdout when no path is given.
///
/// A directory receives a file named `default_name`.
pub fn write_output(
    rendered: &str,
    output: Option<&Path>,
    default_name: &str,
) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(default_name)
            } else {
                path.to_path_buf()
            };
            std::fs::write(&target, rendered)?;
            println!("{}", target.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
