use crate::commands::common::Context;
use crate::error::CliError;

pub async fn run_dark_mode(context: &Context) -> Result<(), CliError> {
    let mut board = context.open_board().await?;
    let status = board.toggle_dark_mode().await;

    let state = if board.is_dark_mode() { "on" } else { "off" };
    println!("Dark mode {state} [{status}]");
    Ok(())
}
