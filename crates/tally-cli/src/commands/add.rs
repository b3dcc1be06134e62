use crate::commands::common::{format_update_line, join_name, Context};
use crate::error::CliError;

pub async fn run_add(name_parts: &[String], context: &Context) -> Result<(), CliError> {
    let name = join_name(name_parts)?;

    let mut board = context.open_board().await?;
    let update = board.add_participant(&name).await?;

    println!(
        "{}  {}",
        update.participant.id,
        format_update_line(&update.participant, update.status)
    );
    Ok(())
}
