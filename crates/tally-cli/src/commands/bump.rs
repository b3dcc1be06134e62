use crate::commands::common::{format_update_line, Context};
use crate::error::CliError;

/// Direction of a count change.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bump {
    Up,
    Down,
}

pub async fn run_bump(query: &str, bump: Bump, context: &Context) -> Result<(), CliError> {
    let mut board = context.open_board().await?;
    let id = board.resolve(query)?;
    let update = match bump {
        Bump::Up => board.increment(id).await?,
        Bump::Down => board.decrement(id).await?,
    };

    println!("{}", format_update_line(&update.participant, update.status));
    Ok(())
}
