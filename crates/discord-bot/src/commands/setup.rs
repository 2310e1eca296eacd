use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

fn role_subcommand<'a>(
    option: &'a mut serenity::builder::CreateApplicationCommandOption,
    name: &str,
    description: &str,
) -> &'a mut serenity::builder::CreateApplicationCommandOption {
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::SubCommand)
        .create_sub_option(|sub_option| {
            sub_option
                .name("role")
                .description("The server role to use")
                .kind(CommandOptionType::Role)
                .required(true)
        })
}

/// Create the /setup command for per-server configuration
pub fn setup_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("setup")
        .description("Configure event management for this server")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("thread_hours")
                .description("How many hours before start the discussion thread opens")
                .kind(CommandOptionType::SubCommand)
                .create_sub_option(|sub_option| {
                    sub_option
                        .name("hours")
                        .description("Lead time in hours (1-336)")
                        .kind(CommandOptionType::Integer)
                        .required(true)
                })
        })
        .create_option(|option| role_subcommand(option, "attack_role", "Role marking attack specialists"))
        .create_option(|option| role_subcommand(option, "defence_role", "Role marking defence specialists"))
        .create_option(|option| {
            role_subcommand(option, "artillery_role", "Role marking artillery specialists")
        })
        .create_option(|option| role_subcommand(option, "armour_role", "Role marking armour crews"))
        .create_option(|option| {
            role_subcommand(option, "pathfinder_role", "Role marking pathfinders")
        })
        .create_option(|option| {
            role_subcommand(option, "manager_role", "Role allowed to manage any event")
        });

    command
}
