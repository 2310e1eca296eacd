use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

/// Create the /squads command
pub fn squads_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("squads")
        .description("Draft squads for an event")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("build")
                .description("Build the squad draft from accepted signups")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("event_id")
                        .description("The event to draft")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("squad_size")
                        .description("Seats per infantry-style squad (1-100)")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("attack")
                        .description("Number of attack squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("defence")
                        .description("Number of defence squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("flex")
                        .description("Number of flex squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("pathfinder")
                        .description("Number of pathfinder squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("armour")
                        .description("Number of armour squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("recon")
                        .description("Number of recon squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("artillery")
                        .description("Number of artillery squads (0-26)")
                        .kind(CommandOptionType::Integer)
                        .required(false)
                })
        });

    command
}
