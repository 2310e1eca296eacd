use eyre::Result;
use muster_core::errors::MusterError;
use muster_core::models::signup::RsvpStatus;
use muster_core::models::squad::{CapacityRequest, Volunteer};
use muster_core::store::Store;
use serenity::model::application::interaction::{
    application_command::{ApplicationCommandInteraction, CommandDataOption},
    InteractionResponseType,
};
use tracing::{info, warn};

use crate::handlers::{can_manage_event, get_option_integer, HandlerContext};

/// Handle the /squads command
pub async fn handle_squads_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let subcommand = command
        .data
        .options
        .first()
        .ok_or_else(|| eyre::eyre!("Missing subcommand"))?;

    match subcommand.name.as_str() {
        "build" => handle_squads_build(ctx, command, subcommand).await,
        _ => {
            respond_text(&ctx, command, "Unknown subcommand").await?;
            Ok(())
        }
    }
}

async fn handle_squads_build(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
    subcommand: &CommandDataOption,
) -> Result<()> {
    let event_id = get_option_integer(subcommand, "event_id")
        .ok_or_else(|| eyre::eyre!("Missing event_id parameter"))?;

    let Some(event) = ctx.store.get_event(event_id).await? else {
        respond_text(&ctx, command, "No such event.").await?;
        return Ok(());
    };

    if !can_manage_event(&ctx, command, &event).await? {
        respond_text(&ctx, command, "You do not have permission to draft this event.").await?;
        return Ok(());
    }

    let capacity = match capacity_from_options(subcommand) {
        Ok(capacity) => capacity,
        Err(reason) => {
            respond_text(&ctx, command, &reason).await?;
            return Ok(());
        }
    };
    if let Err(MusterError::InvalidInput(reason)) = capacity.validate() {
        respond_text(&ctx, command, &reason).await?;
        return Ok(());
    }

    // One draft at a time; a rebuild mid-run would interleave writes.
    let Ok(_permit) = ctx.draft_permits.clone().try_acquire_owned() else {
        respond_text(&ctx, command, "A draft is already running. Try again shortly.").await?;
        return Ok(());
    };

    // Member lookups and the draft itself can exceed the 3 second
    // interaction window, so defer and deliver via followup.
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
        })
        .await?;

    let volunteers = collect_volunteers(&ctx, &event).await?;
    info!(
        "Draft requested: event={}, volunteers={}",
        event_id,
        volunteers.len()
    );

    match muster_engine::draft::run_draft(ctx.store.as_ref(), event_id, volunteers, &capacity)
        .await
    {
        Ok(squads) => {
            command
                .create_followup_message(&ctx.ctx.http, |m| {
                    m.embed(|e| crate::embeds::team_sheet_embed(e, &event, &squads))
                })
                .await?;
        }
        Err(MusterError::InvalidInput(reason)) => {
            command
                .create_followup_message(&ctx.ctx.http, |m| m.content(reason).ephemeral(true))
                .await?;
        }
        Err(e) => return Err(eyre::eyre!(e)),
    }

    Ok(())
}

fn capacity_from_options(subcommand: &CommandDataOption) -> Result<CapacityRequest, String> {
    let count = |name: &str| -> Result<u32, String> {
        let value = get_option_integer(subcommand, name).unwrap_or(0);
        u32::try_from(value).map_err(|_| format!("{} squad count cannot be negative", name))
    };

    let squad_size = get_option_integer(subcommand, "squad_size")
        .ok_or_else(|| "Missing squad_size parameter".to_string())?;
    let infantry_squad_size =
        u32::try_from(squad_size).map_err(|_| "squad size cannot be negative".to_string())?;

    Ok(CapacityRequest {
        infantry_squad_size,
        attack_squads: count("attack")?,
        defence_squads: count("defence")?,
        flex_squads: count("flex")?,
        pathfinder_squads: count("pathfinder")?,
        armour_squads: count("armour")?,
        recon_squads: count("recon")?,
        artillery_squads: count("artillery")?,
    })
}

/// Turns the event's accepted signups into draft volunteers, resolving each
/// member's display name and capability tags from their server roles.
async fn collect_volunteers(
    ctx: &HandlerContext,
    event: &muster_core::models::event::Event,
) -> Result<Vec<Volunteer>> {
    let config = ctx.store.get_guild_config(event.guild_id).await?;
    let signups = ctx.store.get_signups_for_event(event.event_id).await?;

    let mut volunteers = Vec::new();
    for signup in signups {
        if signup.rsvp_status != RsvpStatus::Accepted {
            continue;
        }

        let (display_name, tags) = match ctx
            .ctx
            .http
            .get_member(event.guild_id as u64, signup.user_id as u64)
            .await
        {
            Ok(member) => {
                let role_ids: Vec<i64> = member.roles.iter().map(|r| r.0 as i64).collect();
                (
                    member.display_name().to_string(),
                    muster_engine::draft::tags_for_member(&role_ids, &config),
                )
            }
            Err(e) => {
                warn!(
                    "Member lookup failed for {} in guild {}: {:?}",
                    signup.user_id, event.guild_id, e
                );
                (format!("<@{}>", signup.user_id), Default::default())
            }
        };

        volunteers.push(Volunteer {
            user_id: signup.user_id,
            display_name,
            role_name: signup.role_name,
            subclass_name: signup.subclass_name,
            tags,
        });
    }

    Ok(volunteers)
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
