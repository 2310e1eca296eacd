use serenity::builder::CreateApplicationCommands;

pub mod event;
pub mod rsvp;
pub mod setup;
pub mod squads;

/// Register all slash commands for the bot.
pub fn register_commands(
    commands: &mut CreateApplicationCommands,
) -> &mut CreateApplicationCommands {
    commands.create_application_command(|command| {
        *command = event::event_command();
        command
    });

    commands.create_application_command(|command| {
        *command = rsvp::rsvp_command();
        command
    });

    commands.create_application_command(|command| {
        *command = squads::squads_command();
        command
    });

    commands.create_application_command(|command| {
        *command = setup::setup_command();
        command
    });

    commands
}
