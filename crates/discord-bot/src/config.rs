use eyre::{eyre, Result};
use serde::Deserialize;
use std::env;

/// Configuration for the Discord bot.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Application ID for Discord bot (required)
    pub application_id: u64,
    /// Database connection URL (required)
    pub database_url: String,
    /// Test guild ID for faster command registration during development
    pub test_guild_id: Option<u64>,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let token = env::var("DISCORD_TOKEN")
            .map_err(|_| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = env::var("DISCORD_APPLICATION_ID")
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID environment variable not set"))?
            .parse::<u64>()
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID must be a valid u64"))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| eyre!("DATABASE_URL environment variable not set"))?;

        let test_guild_id = env::var("DISCORD_TEST_GUILD_ID")
            .ok()
            .and_then(|id| id.parse::<u64>().ok());

        Ok(Self {
            token,
            application_id,
            database_url,
            test_guild_id,
        })
    }
}
