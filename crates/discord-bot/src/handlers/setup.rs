use eyre::Result;
use muster_core::models::config::CapabilityRole;
use muster_core::store::Store;
use serenity::model::application::interaction::{
    application_command::ApplicationCommandInteraction, InteractionResponseType,
};
use tracing::info;

use crate::handlers::{get_option_integer, get_option_role_id, HandlerContext};

const MAX_THREAD_HOURS: i64 = 336;

/// Handle the /setup command
pub async fn handle_setup_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| eyre::eyre!("Setup used outside a guild"))?
        .0 as i64;

    if !is_admin(command) {
        respond_text(&ctx, command, "You need Manage Server permission to configure this.")
            .await?;
        return Ok(());
    }

    let subcommand = command
        .data
        .options
        .first()
        .ok_or_else(|| eyre::eyre!("Missing subcommand"))?;

    let confirmation = match subcommand.name.as_str() {
        "thread_hours" => {
            let hours = get_option_integer(subcommand, "hours")
                .ok_or_else(|| eyre::eyre!("Missing hours parameter"))?;

            if !(1..=MAX_THREAD_HOURS).contains(&hours) {
                respond_text(
                    &ctx,
                    command,
                    &format!("Lead time must be between 1 and {} hours.", MAX_THREAD_HOURS),
                )
                .await?;
                return Ok(());
            }

            ctx.store.set_thread_hours(guild_id, hours).await?;
            format!("Discussion threads will open {} hours before start.", hours)
        }
        "manager_role" => {
            let role_id = get_option_role_id(subcommand, "role")
                .ok_or_else(|| eyre::eyre!("Missing role parameter"))?;

            ctx.store.set_manager_role(guild_id, role_id).await?;
            format!("<@&{}> can now manage any event.", role_id)
        }
        name => {
            // The remaining subcommands are the capability role mappings,
            // named `<capability>_role`.
            let Some(capability) = name
                .strip_suffix("_role")
                .and_then(CapabilityRole::parse)
            else {
                respond_text(&ctx, command, "Unknown subcommand").await?;
                return Ok(());
            };

            let role_id = get_option_role_id(subcommand, "role")
                .ok_or_else(|| eyre::eyre!("Missing role parameter"))?;

            ctx.store
                .set_capability_role(guild_id, capability, role_id)
                .await?;
            format!(
                "<@&{}> now marks {} specialists.",
                role_id,
                capability.as_str()
            )
        }
    };

    info!("Setup: guild={}, {}={:?}", guild_id, subcommand.name, subcommand.options);

    respond_text(&ctx, command, &confirmation).await?;
    Ok(())
}

fn is_admin(command: &ApplicationCommandInteraction) -> bool {
    command
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .map(|p| p.administrator() || p.manage_guild())
        .unwrap_or(false)
}

async fn respond_text(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    text: &str,
) -> Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(text).ephemeral(true))
        })
        .await?;

    Ok(())
}
