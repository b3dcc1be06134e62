use crate::commands::common::{
    format_participant_line, participant_to_list_item, Context, ParticipantListItem,
};
use crate::error::CliError;

pub async fn run_list(as_json: bool, context: &Context) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let participants = board.store().participants();

    if as_json {
        let json_items = participants
            .iter()
            .map(participant_to_list_item)
            .collect::<Vec<ParticipantListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if participants.is_empty() {
        println!("No participants yet");
    } else {
        for participant in participants {
            println!("{}", format_participant_line(participant));
        }
    }

    Ok(())
}
