use tally_core::ActivityLogEntry;

use crate::commands::common::{format_log_line, Context};
use crate::error::CliError;

pub async fn run_log(
    query: &str,
    limit: usize,
    as_json: bool,
    context: &Context,
) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let id = board.resolve(query)?;
    let entries = board
        .store()
        .get(id)
        .map(|participant| {
            participant
                .activity_log
                .iter()
                .take(limit)
                .cloned()
                .collect::<Vec<ActivityLogEntry>>()
        })
        .unwrap_or_default();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", format_log_line(entry));
        }
    }

    Ok(())
}
