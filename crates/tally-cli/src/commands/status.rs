use crate::commands::common::Context;
use crate::error::CliError;

pub async fn run_status(context: &Context) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let status = board.status();
    let config = &context.config;

    println!("Status:          {} ({})", status, status.description());
    println!("Participants:    {}", board.store().len());
    println!("Acting as:       {}", board.actor());
    println!(
        "Remote store:    {}",
        config.api_base_url.as_deref().unwrap_or("not configured")
    );
    println!(
        "Static snapshot: {}",
        config.static_snapshot.as_deref().unwrap_or("not configured")
    );
    println!("Local cache:     {}", context.cache_path().display());
    Ok(())
}
