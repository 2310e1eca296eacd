use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

/// Create the /event command with its subcommands
pub fn event_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("event")
        .description("Create and manage community events")
        .dm_permission(false)
        // Create subcommand
        .create_option(|option| {
            option
                .name("create")
                .description("Start the event creation wizard")
                .kind(CommandOptionType::SubCommand)
        })
        // Edit subcommand
        .create_option(|option| {
            option
                .name("edit")
                .description("Edit an event you manage")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to edit")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("title")
                        .description("New title")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("description")
                        .description("New description")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("start")
                        .description("New start time (YYYY-MM-DD HH:MM, event timezone)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("end")
                        .description("New end time (YYYY-MM-DD HH:MM, event timezone)")
                        .kind(CommandOptionType::String)
                        .required(false)
                })
        })
        // Delete subcommand
        .create_option(|option| {
            option
                .name("delete")
                .description("Delete an event you manage")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to delete")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
        })
        // List subcommand
        .create_option(|option| {
            option
                .name("list")
                .description("List upcoming events in this server")
                .kind(CommandOptionType::SubCommand)
        });

    command
}
