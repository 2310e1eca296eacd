use std::sync::Arc;

use eyre::Result;
use muster_db::PgStore;
use muster_engine::{Scheduler, SchedulerConfig};
use serenity::{prelude::GatewayIntents, Client};
use sqlx::PgPool;
use tokio::sync::watch;
use tracing::info;

pub mod commands;
pub mod config;
pub mod embeds;
pub mod handlers;
pub mod presence;

/// Start the Discord bot together with the reconciliation scheduler.
///
/// The scheduler shares the bot's HTTP client through the `Presence`
/// implementation, so both sides act on the platform as the same identity.
/// Runs until the gateway connection ends, then signals the passes to stop.
pub async fn start_bot(config: config::BotConfig, db_pool: PgPool) -> Result<()> {
    info!("Starting Discord bot");

    let store = Arc::new(PgStore::new(db_pool.clone()));
    let handler = handlers::Handler::new(config.clone(), store.clone());

    // The wizard is driven by plain channel messages, which needs the
    // message content intent on top of the defaults.
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.token, intents)
        .application_id(config.application_id)
        .event_handler(handler)
        .await?;

    let http = client.cache_and_http.http.clone();
    let current_user = http.get_current_user().await?;
    let presence = Arc::new(presence::DiscordPresence::new(
        http,
        current_user.id.0 as i64,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::new(store, presence, SchedulerConfig::default());
    let pass_handles = scheduler.spawn(shutdown_rx);

    info!("Connecting to Discord...");
    let run_result = client.start().await;

    let _ = shutdown_tx.send(true);
    for handle in pass_handles {
        let _ = handle.await;
    }

    run_result?;
    Ok(())
}
