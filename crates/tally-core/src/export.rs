//! Export and backup rendering shared by every client.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Participant, Snapshot, BACKUP_DESCRIPTION};
use crate::store::ParticipantStore;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Participant list plus the export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantExport {
    pub participants: Vec<Participant>,
    pub export_date: DateTime<Utc>,
}

/// Render participants as pretty-printed JSON.
pub fn render_json_export(
    participants: &[Participant],
    exported_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ParticipantExport {
        participants: participants.to_vec(),
        export_date: exported_at,
    })
}

/// Render the ranking and totals as a Markdown report.
#[must_use]
pub fn render_markdown_export(store: &ParticipantStore, exported_at: DateTime<Utc>) -> String {
    let totals = store.totals();
    let mut output = String::new();

    let _ = writeln!(output, "# Tally ranking");
    let _ = writeln!(output);
    let _ = writeln!(output, "Exported: {}", exported_at.to_rfc3339());
    let _ = writeln!(output);
    let _ = writeln!(output, "- Participants: {}", totals.participants);
    let _ = writeln!(output, "- Total count: {}", totals.total_count);
    let _ = writeln!(output, "- Total fine: {}", totals.total_fine);
    let _ = writeln!(output);
    let _ = writeln!(output, "| Rank | Name | Count | Fine |");
    let _ = writeln!(output, "|-----:|------|------:|-----:|");
    for row in store.ranking() {
        let medal = row.medal.map(|medal| format!(" {}", medal.symbol())).unwrap_or_default();
        let _ = writeln!(
            output,
            "| {}{medal} | {} | {} | {} |",
            row.rank,
            row.participant.name,
            row.participant.count,
            row.participant.fine()
        );
    }

    output
}

/// Render according to the selected format.
pub fn render_participants_export(
    store: &ParticipantStore,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(store.participants(), exported_at),
        ExportFormat::Markdown => Ok(render_markdown_export(store, exported_at)),
    }
}

/// Render a full snapshot backup, restorable as a static snapshot.
pub fn render_backup(
    participants: &[Participant],
    is_dark_mode: bool,
    at: DateTime<Utc>,
) -> serde_json::Result<String> {
    Snapshot::capture_with_description(participants, is_dark_mode, at, BACKUP_DESCRIPTION)
        .to_json_pretty()
}

/// Deterministic default file name for exports.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
    format!("ranking-data-{}.{}", at.format("%Y-%m-%d"), format.extension())
}

/// Deterministic default file name for backups.
#[must_use]
pub fn suggested_backup_file_name(at: DateTime<Utc>) -> String {
    format!("backup-data-{}.json", at.format("%Y-%m-%d"))
}
