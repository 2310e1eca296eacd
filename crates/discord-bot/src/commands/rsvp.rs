use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

/// Create the /rsvp command with its subcommands
pub fn rsvp_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("rsvp")
        .description("Respond to an event")
        .dm_permission(false)
        // Accept subcommand
        .create_option(|option| {
            option
                .name("accept")
                .description("Accept an event, optionally picking a role")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to respond to")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("role")
                        .description("Primary role (Commander, Infantry, Armour, Recon, Artillery, Pathfinder)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("subclass")
                        .description("Subclass for Infantry, Armour or Recon")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
        })
        // Tentative subcommand
        .create_option(|option| {
            option
                .name("tentative")
                .description("Mark yourself as tentative for an event")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to respond to")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
        })
        // Decline subcommand
        .create_option(|option| {
            option
                .name("decline")
                .description("Decline an event")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to respond to")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
        });

    command
}
