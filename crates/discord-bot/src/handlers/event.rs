use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use eyre::Result;
use muster_core::models::event::{Event, EventUpdate};
use muster_core::store::Store;
use muster_core::wizard::{EventWizard, StepOutcome, DATETIME_FORMAT};
use muster_db::PgStore;
use serenity::model::application::interaction::{
    application_command::{ApplicationCommandInteraction, CommandDataOption},
    InteractionResponseType,
};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, UserId};
use serenity::prelude::Context;
use serenity::utils::Color;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::embeds;
use crate::handlers::{
    can_manage_event, get_option_integer, get_option_string, refresh_summary_message,
    summarize_event, HandlerContext, MAX_ACTIVE_WIZARDS,
};

/// Handle the /event command
pub async fn handle_event_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let subcommand = command
        .data
        .options
        .first()
        .ok_or_else(|| eyre::eyre!("Missing subcommand"))?;

    match subcommand.name.as_str() {
        "create" => handle_event_create(ctx, command).await,
        "edit" => handle_event_edit(ctx, command, subcommand).await,
        "delete" => handle_event_delete(ctx, command, subcommand).await,
        "list" => handle_event_list(ctx, command).await,
        _ => {
            respond_text(&ctx, command, "Unknown subcommand").await?;
            Ok(())
        }
    }
}

/// Handle the /event create subcommand: opens a wizard for the caller.
async fn handle_event_create(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| eyre::eyre!("Command must be used in a server"))?;
    let now = Utc::now();

    let mut wizards = ctx.wizards.write().await;
    wizards.retain(|_, wizard| !wizard.is_expired(now));

    if wizards.contains_key(&command.user.id) {
        drop(wizards);
        respond_text(
            &ctx,
            command,
            "You already have an event wizard open. Answer it or type `cancel`.",
        )
        .await?;
        return Ok(());
    }

    if wizards.len() >= MAX_ACTIVE_WIZARDS {
        drop(wizards);
        respond_text(
            &ctx,
            command,
            "Too many event wizards are open right now. Try again in a minute.",
        )
        .await?;
        return Ok(());
    }

    let wizard = EventWizard::new(
        guild_id.0 as i64,
        command.channel_id.0 as i64,
        command.user.id.0 as i64,
        now,
    );
    let prompt = wizard.prompt();
    wizards.insert(command.user.id, wizard);
    drop(wizards);

    respond_text(&ctx, command, &prompt).await?;
    Ok(())
}

/// Advances the author's wizard, if one is open for this channel.
pub async fn handle_wizard_message(
    ctx: &Context,
    store: &PgStore,
    wizards: &RwLock<HashMap<UserId, EventWizard>>,
    msg: &Message,
) -> Result<()> {
    let now = Utc::now();

    // Fast path: no wizard for this author.
    {
        let guard = wizards.read().await;
        match guard.get(&msg.author.id) {
            Some(wizard) if wizard.channel_id == msg.channel_id.0 as i64 => {}
            _ => return Ok(()),
        }
    }

    let mut guard = wizards.write().await;
    let Some(wizard) = guard.get_mut(&msg.author.id) else {
        return Ok(());
    };

    if wizard.is_expired(now) {
        guard.remove(&msg.author.id);
        drop(guard);
        msg.reply(ctx, "The event wizard timed out. Run `/event create` to start over.")
            .await?;
        return Ok(());
    }

    let outcome = wizard.advance(&msg.content, now);
    let (guild_id, channel_id, user_id) = (wizard.guild_id, wizard.channel_id, wizard.user_id);

    match outcome {
        StepOutcome::Prompt(prompt) | StepOutcome::Invalid(prompt) => {
            drop(guard);
            msg.reply(ctx, prompt).await?;
        }
        StepOutcome::Cancelled => {
            guard.remove(&msg.author.id);
            drop(guard);
            msg.reply(ctx, "Event creation cancelled.").await?;
        }
        StepOutcome::Finished(fields) => {
            guard.remove(&msg.author.id);
            drop(guard);

            let event_id = store
                .create_event(guild_id, channel_id, user_id, *fields)
                .await?;
            info!("Created event {} via wizard for user {}", event_id, user_id);

            let Some(event) = store.get_event(event_id).await? else {
                return Err(eyre::eyre!("Event {} vanished after creation", event_id));
            };

            post_summary_message(ctx, store, &event).await?;
            msg.reply(ctx, format!("Event #{} created.", event_id)).await?;
        }
    }

    Ok(())
}

/// Posts the summary embed with RSVP buttons and records the message id.
async fn post_summary_message(ctx: &Context, store: &PgStore, event: &Event) -> Result<()> {
    let summary = summarize_event(ctx, store, event).await?;

    let message = ChannelId(event.channel_id as u64)
        .send_message(&ctx.http, |m| {
            m.embed(|e| embeds::event_summary_embed(e, &summary))
                .components(|c| embeds::rsvp_buttons(c))
        })
        .await?;

    store
        .update_event_message_id(event.event_id, message.id.0 as i64)
        .await?;

    Ok(())
}

/// Handle the /event edit subcommand
async fn handle_event_edit(
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
        respond_text(&ctx, command, "Only the creator or an event manager can edit this event.")
            .await?;
        return Ok(());
    }

    let mut update = EventUpdate {
        title: event.title.clone(),
        description: event.description.clone(),
        start_time: event.start_time,
        end_time: event.end_time,
    };

    if let Some(title) = get_option_string(subcommand, "title") {
        update.title = title;
    }
    if let Some(description) = get_option_string(subcommand, "description") {
        update.description = description;
    }
    if let Some(start) = get_option_string(subcommand, "start") {
        match parse_in_event_zone(&event, &start) {
            Some(start_time) => update.start_time = start_time,
            None => {
                respond_text(&ctx, command, "Could not read the start time. Use `YYYY-MM-DD HH:MM`.")
                    .await?;
                return Ok(());
            }
        }
    }
    if let Some(end) = get_option_string(subcommand, "end") {
        match parse_in_event_zone(&event, &end) {
            Some(end_time) => update.end_time = Some(end_time),
            None => {
                respond_text(&ctx, command, "Could not read the end time. Use `YYYY-MM-DD HH:MM`.")
                    .await?;
                return Ok(());
            }
        }
    }

    if update.end_time.is_some_and(|end| end <= update.start_time) {
        respond_text(&ctx, command, "The end time must come after the start time.").await?;
        return Ok(());
    }

    ctx.store.update_event(event_id, update).await?;

    if let Some(updated) = ctx.store.get_event(event_id).await? {
        refresh_summary_message(&ctx, &updated).await?;
    }

    respond_text(&ctx, command, &format!("Event #{} updated.", event_id)).await?;
    Ok(())
}

/// Handle the /event delete subcommand
async fn handle_event_delete(
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
        respond_text(&ctx, command, "Only the creator or an event manager can delete this event.")
            .await?;
        return Ok(());
    }

    // Best-effort external teardown; the retention pass sweeps up leftovers.
    if let Some(message_id) = event.message_id {
        if let Err(e) = ChannelId(event.channel_id as u64)
            .delete_message(&ctx.ctx.http, message_id as u64)
            .await
        {
            warn!("Failed to delete summary for event {}: {:?}", event_id, e);
        }
    }
    if let Some(thread_id) = event.thread_id {
        if let Err(e) = ChannelId(thread_id as u64).delete(&ctx.ctx.http).await {
            warn!("Failed to delete thread for event {}: {:?}", event_id, e);
        }
    }

    ctx.store.delete_event(event_id).await?;

    respond_text(&ctx, command, &format!("Event #{} deleted.", event_id)).await?;
    Ok(())
}

/// Handle the /event list subcommand
async fn handle_event_list(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| eyre::eyre!("Command must be used in a server"))?;

    let events = ctx.store.get_upcoming_events(guild_id.0 as i64).await?;

    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.embed(|e| {
                        e.title("Upcoming events").color(Color::DARK_GREEN);
                        if events.is_empty() {
                            e.description("No upcoming events. Start one with `/event create`.");
                        } else {
                            for event in events.iter().take(25) {
                                e.field(
                                    format!("#{} — {}", event.event_id, event.title),
                                    format!("<t:{}:F>", event.start_time.timestamp()),
                                    false,
                                );
                            }
                        }
                        e
                    })
                })
        })
        .await?;

    Ok(())
}

fn parse_in_event_zone(event: &Event, input: &str) -> Option<chrono::DateTime<Utc>> {
    let tz: Tz = event.timezone.parse().ok()?;
    let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
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
