use eyre::Result;
use muster_core::models::event::Event;
use muster_core::models::signup::{
    subclasses_for, RsvpStatus, PRIMARY_ROLES, RESTRICTED_ROLES,
};
use muster_core::store::Store;
use serenity::model::application::interaction::{
    application_command::{ApplicationCommandInteraction, CommandDataOption},
    message_component::MessageComponentInteraction,
    InteractionResponseType,
};
use tracing::info;

use crate::embeds::{RSVP_ACCEPT_ID, RSVP_DECLINE_ID, RSVP_TENTATIVE_ID};
use crate::handlers::{get_option_integer, get_option_string, refresh_summary_message, HandlerContext};

/// Handle the /rsvp command
pub async fn handle_rsvp_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let subcommand = command
        .data
        .options
        .first()
        .ok_or_else(|| eyre::eyre!("Missing subcommand"))?;

    let status = match subcommand.name.as_str() {
        "accept" => RsvpStatus::Accepted,
        "tentative" => RsvpStatus::Tentative,
        "decline" => RsvpStatus::Declined,
        _ => {
            respond_text(&ctx, command, "Unknown subcommand").await?;
            return Ok(());
        }
    };

    let event_id = get_option_integer(subcommand, "event_id")
        .ok_or_else(|| eyre::eyre!("Missing event_id parameter"))?;

    let Some(event) = ctx.store.get_event(event_id).await? else {
        respond_text(&ctx, command, "No such event.").await?;
        return Ok(());
    };

    let user_id = command.user.id.0 as i64;

    let mut confirmation = format!("You are marked **{}** for #{}.", status, event_id);

    if status == RsvpStatus::Accepted {
        if let Some(reply) = validated_role(&ctx, command, subcommand, &event).await? {
            match reply {
                RoleChoice::Rejected(text) => {
                    respond_text(&ctx, command, &text).await?;
                    return Ok(());
                }
                RoleChoice::Role(role, subclass) => {
                    ctx.store.set_rsvp(event_id, user_id, status).await?;
                    ctx.store
                        .update_signup_role(event_id, user_id, &role, subclass.clone())
                        .await?;
                    confirmation = match subclass {
                        Some(subclass) => format!(
                            "You are marked **Accepted** for #{} as {} ({}).",
                            event_id, role, subclass
                        ),
                        None => format!(
                            "You are marked **Accepted** for #{} as {}.",
                            event_id, role
                        ),
                    };
                }
                RoleChoice::None => {
                    ctx.store.set_rsvp(event_id, user_id, status).await?;
                }
            }
        }
    } else {
        ctx.store.set_rsvp(event_id, user_id, status).await?;
    }

    info!("RSVP: event={}, user={}, status={}", event_id, user_id, status);

    if let Some(updated) = ctx.store.get_event(event_id).await? {
        refresh_summary_message(&ctx, &updated).await?;
    }

    respond_text(&ctx, command, &confirmation).await?;
    Ok(())
}

enum RoleChoice {
    /// A valid role (and optional subclass) was picked.
    Role(String, Option<String>),
    /// No role option was supplied.
    None,
    /// The choice was invalid; contains the user-facing reason.
    Rejected(String),
}

/// Validates the role/subclass options for an accept, including the
/// restricted-role gate: Commander, Recon, Officer and Tank Commander seats
/// require a server role of the same name.
async fn validated_role(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    subcommand: &CommandDataOption,
    event: &Event,
) -> Result<Option<RoleChoice>> {
    let Some(role) = get_option_string(subcommand, "role") else {
        return Ok(Some(RoleChoice::None));
    };

    if !PRIMARY_ROLES.contains(&role.as_str()) {
        return Ok(Some(RoleChoice::Rejected(format!(
            "Unknown role `{}`. Pick one of: {}.",
            role,
            PRIMARY_ROLES.join(", ")
        ))));
    }

    let subclass = get_option_string(subcommand, "subclass");
    if let Some(subclass) = &subclass {
        match subclasses_for(&role) {
            Some(valid) if valid.contains(&subclass.as_str()) => {}
            Some(valid) => {
                return Ok(Some(RoleChoice::Rejected(format!(
                    "`{}` is not a {} subclass. Pick one of: {}.",
                    subclass,
                    role,
                    valid.join(", ")
                ))));
            }
            None => {
                return Ok(Some(RoleChoice::Rejected(format!(
                    "{} does not take a subclass.",
                    role
                ))));
            }
        }
    }

    for restricted in RESTRICTED_ROLES {
        let picked = role == *restricted || subclass.as_deref() == Some(*restricted);
        if picked && !has_named_role(ctx, command, event, restricted).await? {
            return Ok(Some(RoleChoice::Rejected(format!(
                "The {} seat requires the `{}` server role.",
                restricted, restricted
            ))));
        }
    }

    Ok(Some(RoleChoice::Role(role, subclass)))
}

/// True when the member holds a guild role with the given name.
async fn has_named_role(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    event: &Event,
    name: &str,
) -> Result<bool> {
    let Some(member) = &command.member else {
        return Ok(false);
    };

    let guild_roles = ctx.ctx.http.get_guild_roles(event.guild_id as u64).await?;

    Ok(guild_roles
        .iter()
        .filter(|r| r.name == name)
        .any(|r| member.roles.contains(&r.id)))
}

/// Handle the RSVP buttons under a posted summary.
pub async fn handle_rsvp_component(
    ctx: HandlerContext,
    component: &MessageComponentInteraction,
) -> Result<()> {
    let status = match component.data.custom_id.as_str() {
        RSVP_ACCEPT_ID => RsvpStatus::Accepted,
        RSVP_TENTATIVE_ID => RsvpStatus::Tentative,
        RSVP_DECLINE_ID => RsvpStatus::Declined,
        _ => return Ok(()),
    };

    let message_id = component.message.id.0 as i64;
    let Some(event) = ctx.store.get_event_by_message_id(message_id).await? else {
        component
            .create_interaction_response(&ctx.ctx.http, |r| {
                r.kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|m| {
                        m.content("This event no longer exists.").ephemeral(true)
                    })
            })
            .await?;
        return Ok(());
    };

    let user_id = component.user.id.0 as i64;
    ctx.store.set_rsvp(event.event_id, user_id, status).await?;

    info!(
        "RSVP via button: event={}, user={}, status={}",
        event.event_id, user_id, status
    );

    refresh_summary_message(&ctx, &event).await?;

    component
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.content(format!(
                        "You are marked **{}** for #{}. Pick a role with `/rsvp accept`.",
                        status, event.event_id
                    ))
                    .ephemeral(true)
                })
        })
        .await?;

    Ok(())
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
