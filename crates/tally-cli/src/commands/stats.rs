use crate::commands::common::Context;
use crate::error::CliError;

pub async fn run_stats(as_json: bool, context: &Context) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let totals = board.store().totals();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        println!("Participants: {}", totals.participants);
        println!("Total count:  {}", totals.total_count);
        println!("Total fine:   {}", totals.total_fine);
    }

    Ok(())
}
