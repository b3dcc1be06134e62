use crate::commands::common::{confirm, Context};
use crate::error::CliError;

pub async fn run_remove(query: &str, assume_yes: bool, context: &Context) -> Result<(), CliError> {
    let mut board = context.open_board().await?;
    let id = board.resolve(query)?;
    let name = board
        .store()
        .get(id)
        .map(|participant| participant.name.clone())
        .unwrap_or_default();

    if !confirm(&format!("Remove {name}?"), assume_yes, "remove a participant")? {
        println!("Cancelled");
        return Ok(());
    }

    let update = board.remove(id).await?;
    println!("Removed {} [{}]", update.participant.name, update.status);
    Ok(())
}
