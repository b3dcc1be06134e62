use tally_core::ActorProfile;

use crate::cli::ProfileCommands;
use crate::commands::common::{join_name, Context};
use crate::error::CliError;

pub async fn run_profile(command: ProfileCommands, context: &Context) -> Result<(), CliError> {
    let cache = context.open_cache();
    match command {
        ProfileCommands::Set { name } => {
            let profile = ActorProfile::new(&join_name(&name)?)?;
            cache.save_profile(&profile).await?;
            println!("Profile set to {}", profile.name);
        }
        ProfileCommands::Show => match cache.load_profile().await? {
            Some(profile) => {
                println!("Name:    {}", profile.name);
                println!("Created: {}", profile.created_at.to_rfc3339());
                println!("Device:  {}", profile.device_info);
            }
            None => println!(
                "No profile set; entries are labelled {}",
                ActorProfile::actor_label(None)
            ),
        },
        ProfileCommands::Clear => {
            cache.clear_profile().await?;
            println!("Profile cleared");
        }
    }
    Ok(())
}
