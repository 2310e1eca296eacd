use std::collections::HashMap;
use std::sync::Arc;

use eyre::Result;
use muster_core::models::event::{Event, EventSummary, SummaryEntry};
use muster_core::models::signup::RsvpStatus;
use muster_core::store::Store;
use muster_core::wizard::EventWizard;
use muster_db::PgStore;
use serenity::{
    async_trait,
    model::{
        application::interaction::{Interaction, InteractionResponseType},
        channel::Message,
        gateway::Ready,
        id::UserId,
    },
    prelude::*,
};
use tokio::sync::{RwLock, Semaphore};
use tracing::{error, info};

pub mod event;
pub mod rsvp;
pub mod setup;
pub mod squads;

use crate::config::BotConfig;

/// Upper bound on concurrently active creation wizards across all guilds.
pub(crate) const MAX_ACTIVE_WIZARDS: usize = 64;

/// Main Discord handler that processes all events.
pub struct Handler {
    config: BotConfig,
    store: Arc<PgStore>,
    wizards: Arc<RwLock<HashMap<UserId, EventWizard>>>,
    draft_permits: Arc<Semaphore>,
}

impl Handler {
    /// Create a new handler
    pub fn new(config: BotConfig, store: Arc<PgStore>) -> Self {
        Self {
            config,
            store,
            wizards: Arc::new(RwLock::new(HashMap::new())),
            draft_permits: Arc::new(Semaphore::new(1)),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // For dev testing, register for a specific guild to avoid the global
        // command cache delay.
        if let Some(test_guild_id) = self.config.test_guild_id {
            let guild_id = serenity::model::id::GuildId(test_guild_id);

            match guild_id
                .set_application_commands(&ctx.http, |commands| {
                    crate::commands::register_commands(commands)
                })
                .await
            {
                Ok(cmds) => {
                    info!(
                        "Guild commands registered for {}: {} commands",
                        test_guild_id,
                        cmds.len()
                    );
                }
                Err(why) => {
                    error!("Error registering guild commands: {:?}", why);
                }
            }
        }

        match serenity::model::application::command::Command::set_global_application_commands(
            &ctx.http,
            |commands| crate::commands::register_commands(commands),
        )
        .await
        {
            Ok(cmds) => {
                info!("Global commands registered: {} commands", cmds.len());
            }
            Err(why) => {
                error!("Error registering global commands: {:?}", why);
            }
        }
    }

    /// Plain channel messages drive any wizard the author has open.
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = event::handle_wizard_message(&ctx, &self.store, &self.wizards, &msg).await {
            error!("Error advancing wizard for {}: {:?}", msg.author.id, e);
        }
    }

    /// Handle interactions (slash commands, buttons, etc.)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                info!("Received command: {}", command.data.name);

                let handler_ctx = HandlerContext {
                    ctx: ctx.clone(),
                    config: self.config.clone(),
                    store: self.store.clone(),
                    wizards: self.wizards.clone(),
                    draft_permits: self.draft_permits.clone(),
                };

                let result = match command.data.name.as_str() {
                    "event" => event::handle_event_command(handler_ctx, &command).await,
                    "rsvp" => rsvp::handle_rsvp_command(handler_ctx, &command).await,
                    "squads" => squads::handle_squads_command(handler_ctx, &command).await,
                    "setup" => setup::handle_setup_command(handler_ctx, &command).await,
                    _ => {
                        error!("Unknown command: {}", command.data.name);
                        Err(eyre::eyre!("Unknown command"))
                    }
                };

                if let Err(e) = result {
                    error!("Error handling command: {:?}", e);

                    if let Err(why) = command
                        .create_interaction_response(&ctx.http, |r| {
                            r.kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|m| {
                                    m.content(format!("Error: {}", e)).ephemeral(true)
                                })
                        })
                        .await
                    {
                        error!("Failed to send error response: {:?}", why);
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                let handler_ctx = HandlerContext {
                    ctx: ctx.clone(),
                    config: self.config.clone(),
                    store: self.store.clone(),
                    wizards: self.wizards.clone(),
                    draft_permits: self.draft_permits.clone(),
                };

                if let Err(e) = rsvp::handle_rsvp_component(handler_ctx, &component).await {
                    error!("Error handling component interaction: {:?}", e);
                }
            }
            _ => {}
        }
    }
}

/// Shared context for command handlers.
pub struct HandlerContext {
    pub ctx: Context,
    pub config: BotConfig,
    pub store: Arc<PgStore>,
    pub wizards: Arc<RwLock<HashMap<UserId, EventWizard>>>,
    pub draft_permits: Arc<Semaphore>,
}

/// Extract a string option from a subcommand
pub(crate) fn get_option_string(
    options: &serenity::model::application::interaction::application_command::CommandDataOption,
    name: &str,
) -> Option<String> {
    options
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Extract an integer option from a subcommand
pub(crate) fn get_option_integer(
    options: &serenity::model::application::interaction::application_command::CommandDataOption,
    name: &str,
) -> Option<i64> {
    options
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Role options arrive as the role id rendered to a string
pub(crate) fn get_option_role_id(
    options: &serenity::model::application::interaction::application_command::CommandDataOption,
    name: &str,
) -> Option<i64> {
    get_option_string(options, name).and_then(|s| s.parse::<i64>().ok())
}

/// True when the member may edit or delete the event: its creator, a holder
/// of the configured manager role, or a server administrator.
pub async fn can_manage_event(
    ctx: &HandlerContext,
    command: &serenity::model::application::interaction::application_command::ApplicationCommandInteraction,
    event: &Event,
) -> Result<bool> {
    if command.user.id.0 as i64 == event.creator_id {
        return Ok(true);
    }

    if let Some(member) = &command.member {
        if member
            .permissions
            .map(|p| p.administrator() || p.manage_guild())
            .unwrap_or(false)
        {
            return Ok(true);
        }

        let config = ctx.store.get_guild_config(event.guild_id).await?;
        if let Some(manager_role_id) = config.manager_role_id {
            if member.roles.iter().any(|r| r.0 as i64 == manager_role_id) {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Builds a render-ready summary for an event, resolving display names over
/// the gateway HTTP client. A failed lookup falls back to a mention.
pub async fn summarize_event(
    ctx: &Context,
    store: &PgStore,
    event: &Event,
) -> Result<EventSummary> {
    let signups = store.get_signups_for_event(event.event_id).await?;

    let mut accepted = Vec::new();
    let mut tentative = Vec::new();
    let mut declined = Vec::new();

    for signup in signups {
        let display_name = match ctx
            .http
            .get_member(event.guild_id as u64, signup.user_id as u64)
            .await
        {
            Ok(member) => member.display_name().to_string(),
            Err(_) => format!("<@{}>", signup.user_id),
        };

        match signup.rsvp_status {
            RsvpStatus::Accepted => accepted.push(SummaryEntry {
                user_id: signup.user_id,
                display_name,
                role_name: signup.role_name,
                subclass_name: signup.subclass_name,
            }),
            RsvpStatus::Tentative => tentative.push(display_name),
            RsvpStatus::Declined => declined.push(display_name),
        }
    }

    Ok(EventSummary {
        event: event.clone(),
        accepted,
        tentative,
        declined,
    })
}

/// Re-renders the posted summary message after a state change. Missing
/// messages are left for the self-heal pass.
pub async fn refresh_summary_message(ctx: &HandlerContext, event: &Event) -> Result<()> {
    let Some(message_id) = event.message_id else {
        return Ok(());
    };

    let summary = summarize_event(&ctx.ctx, &ctx.store, event).await?;

    if let Err(e) = serenity::model::id::ChannelId(event.channel_id as u64)
        .edit_message(&ctx.ctx.http, message_id as u64, |m| {
            m.embed(|e| crate::embeds::event_summary_embed(e, &summary))
        })
        .await
    {
        tracing::warn!(
            "Failed to refresh summary for event {}: {:?}",
            event.event_id,
            e
        );
    }

    Ok(())
}
