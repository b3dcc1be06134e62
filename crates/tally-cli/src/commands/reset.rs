use crate::commands::common::{confirm, Context};
use crate::error::CliError;

pub async fn run_reset(assume_yes: bool, context: &Context) -> Result<(), CliError> {
    let mut board = context.open_board().await?;
    let prompt = format!("Remove all {} participants?", board.store().len());
    if !confirm(&prompt, assume_yes, "reset the board")? {
        println!("Cancelled");
        return Ok(());
    }

    let status = board.reset().await;
    println!("Board reset [{status}]");
    Ok(())
}
