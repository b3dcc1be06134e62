use crate::commands::common::{format_ranking_line, ranking_to_item, Context, RankingItem};
use crate::error::CliError;

pub async fn run_ranking(as_json: bool, context: &Context) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let ranking = board.store().ranking();

    if as_json {
        let json_items = ranking.iter().map(ranking_to_item).collect::<Vec<RankingItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for row in &ranking {
            println!("{}", format_ranking_line(row));
        }
    }

    Ok(())
}
