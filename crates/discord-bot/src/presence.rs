use std::sync::Arc;

use async_trait::async_trait;
use muster_core::models::event::EventSummary;
use muster_core::presence::{Presence, PresenceError, PresenceResult, SummaryStatus};
use serenity::http::{Http, HttpError, StatusCode};
use serenity::model::id::ChannelId;
use tracing::debug;

use crate::embeds;

/// [`Presence`] over the Discord HTTP API. Summaries are embed messages,
/// discussion spaces are private threads on the event's channel.
pub struct DiscordPresence {
    http: Arc<Http>,
    self_user_id: i64,
}

impl DiscordPresence {
    pub fn new(http: Arc<Http>, self_user_id: i64) -> Self {
        Self { http, self_user_id }
    }
}

fn map_error(e: serenity::Error) -> PresenceError {
    if let serenity::Error::Http(http_err) = &e {
        if let HttpError::UnsuccessfulRequest(resp) = http_err.as_ref() {
            match resp.status_code {
                StatusCode::NOT_FOUND => return PresenceError::NotFound,
                StatusCode::FORBIDDEN => return PresenceError::Forbidden,
                _ => {}
            }
        }
    }
    PresenceError::Transient(e.to_string())
}

#[async_trait]
impl Presence for DiscordPresence {
    async fn post_summary(&self, channel_id: i64, summary: &EventSummary) -> PresenceResult<i64> {
        debug!("Posting summary for event {} to channel {}", summary.event.event_id, channel_id);

        let message = ChannelId(channel_id as u64)
            .send_message(&self.http, |m| {
                m.embed(|e| embeds::event_summary_embed(e, summary))
                    .components(|c| embeds::rsvp_buttons(c))
            })
            .await
            .map_err(map_error)?;

        Ok(message.id.0 as i64)
    }

    async fn fetch_summary(
        &self,
        channel_id: i64,
        message_id: i64,
    ) -> PresenceResult<SummaryStatus> {
        match self
            .http
            .get_message(channel_id as u64, message_id as u64)
            .await
        {
            Ok(_) => Ok(SummaryStatus::Found),
            Err(e) => match map_error(e) {
                PresenceError::NotFound => Ok(SummaryStatus::Missing),
                other => Err(other),
            },
        }
    }

    async fn edit_summary(
        &self,
        channel_id: i64,
        message_id: i64,
        summary: &EventSummary,
    ) -> PresenceResult<()> {
        ChannelId(channel_id as u64)
            .edit_message(&self.http, message_id as u64, |m| {
                m.embed(|e| embeds::event_summary_embed(e, summary))
            })
            .await
            .map_err(map_error)?;

        Ok(())
    }

    async fn delete_summary(&self, channel_id: i64, message_id: i64) -> PresenceResult<()> {
        ChannelId(channel_id as u64)
            .delete_message(&self.http, message_id as u64)
            .await
            .map_err(map_error)
    }

    async fn create_discussion_space(&self, channel_id: i64, name: &str) -> PresenceResult<i64> {
        debug!("Creating discussion thread {:?} on channel {}", name, channel_id);

        let thread = ChannelId(channel_id as u64)
            .create_private_thread(&self.http, |t| t.name(name))
            .await
            .map_err(map_error)?;

        Ok(thread.id.0 as i64)
    }

    async fn delete_discussion_space(&self, space_id: i64) -> PresenceResult<()> {
        ChannelId(space_id as u64)
            .delete(&self.http)
            .await
            .map_err(map_error)?;

        Ok(())
    }

    async fn list_space_members(&self, space_id: i64) -> PresenceResult<Vec<i64>> {
        let members = self
            .http
            .get_channel_thread_members(space_id as u64)
            .await
            .map_err(map_error)?;

        Ok(members
            .iter()
            .filter_map(|m| m.user_id.map(|id| id.0 as i64))
            .collect())
    }

    async fn add_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()> {
        self.http
            .add_thread_channel_member(space_id as u64, user_id as u64)
            .await
            .map_err(map_error)
    }

    async fn remove_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()> {
        self.http
            .remove_thread_channel_member(space_id as u64, user_id as u64)
            .await
            .map_err(map_error)
    }

    async fn fetch_member_display_name(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> PresenceResult<String> {
        let member = self
            .http
            .get_member(guild_id as u64, user_id as u64)
            .await
            .map_err(map_error)?;

        Ok(member.display_name().to_string())
    }

    async fn fetch_member_role_ids(&self, guild_id: i64, user_id: i64) -> PresenceResult<Vec<i64>> {
        let member = self
            .http
            .get_member(guild_id as u64, user_id as u64)
            .await
            .map_err(map_error)?;

        Ok(member.roles.iter().map(|r| r.0 as i64).collect())
    }

    fn self_user_id(&self) -> i64 {
        self.self_user_id
    }
}
