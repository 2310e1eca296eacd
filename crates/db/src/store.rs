use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use muster_core::models::config::{CapabilityRole, GuildConfig};
use muster_core::models::event::{Event, EventUpdate, NewEvent};
use muster_core::models::signup::{RsvpStatus, Signup};
use muster_core::models::squad::SquadWithMembers;
use muster_core::store::Store;

use crate::repositories::{events, guilds, signups, squads};
use crate::DbPool;

/// Postgres-backed [`Store`]. Thin delegation onto the repository functions;
/// all conversion from row types to domain types happens here.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn into_events(rows: Vec<crate::models::DbEvent>) -> Vec<Event> {
    rows.into_iter().map(Event::from).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn get_event(&self, event_id: i64) -> Result<Option<Event>> {
        Ok(events::get_event(&self.pool, event_id).await?.map(Event::from))
    }

    async fn get_event_by_message_id(&self, message_id: i64) -> Result<Option<Event>> {
        Ok(events::get_event_by_message_id(&self.pool, message_id)
            .await?
            .map(Event::from))
    }

    async fn get_upcoming_events(&self, guild_id: i64) -> Result<Vec<Event>> {
        let rows = events::get_upcoming_events(&self.pool, guild_id, Utc::now()).await?;
        Ok(into_events(rows))
    }

    async fn get_events_for_thread_creation(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let rows = events::get_events_for_thread_creation(&self.pool, now).await?;
        Ok(into_events(rows))
    }

    async fn get_events_for_recreation(
        &self,
        now: DateTime<Utc>,
        recheck_interval: Duration,
    ) -> Result<Vec<Event>> {
        let rows = events::get_events_for_recreation(&self.pool, now, recheck_interval).await?;
        Ok(into_events(rows))
    }

    async fn get_latest_child_event(&self, parent_event_id: i64) -> Result<Option<Event>> {
        Ok(events::get_latest_child_event(&self.pool, parent_event_id)
            .await?
            .map(Event::from))
    }

    async fn get_active_events_with_message_id(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let rows = events::get_active_events_with_message_id(&self.pool, now).await?;
        Ok(into_events(rows))
    }

    async fn get_active_events_with_threads(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let rows = events::get_active_events_with_threads(&self.pool, now).await?;
        Ok(into_events(rows))
    }

    async fn get_past_events_with_tentatives(&self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let rows = events::get_past_events_with_tentatives(&self.pool, now).await?;
        Ok(into_events(rows))
    }

    async fn get_finished_events_for_cleanup(
        &self,
        now: DateTime<Utc>,
        grace: Duration,
    ) -> Result<Vec<Event>> {
        let rows = events::get_finished_events_for_cleanup(&self.pool, now, grace).await?;
        Ok(into_events(rows))
    }

    async fn get_events_for_purging(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Result<Vec<Event>> {
        let rows = events::get_events_for_purging(&self.pool, now, retention).await?;
        Ok(into_events(rows))
    }

    async fn create_event(
        &self,
        guild_id: i64,
        channel_id: i64,
        creator_id: i64,
        fields: NewEvent,
    ) -> Result<i64> {
        events::create_event(&self.pool, guild_id, channel_id, creator_id, &fields).await
    }

    async fn update_event(&self, event_id: i64, update: EventUpdate) -> Result<()> {
        events::update_event(&self.pool, event_id, &update).await
    }

    async fn update_event_message_id(&self, event_id: i64, message_id: i64) -> Result<()> {
        events::update_event_message_id(&self.pool, event_id, message_id).await
    }

    async fn set_event_thread(&self, event_id: i64, thread_id: i64) -> Result<()> {
        events::set_event_thread(&self.pool, event_id, thread_id).await
    }

    async fn mark_thread_created(&self, event_id: i64) -> Result<()> {
        events::mark_thread_created(&self.pool, event_id).await
    }

    async fn update_last_recreated_at(&self, event_id: i64, at: DateTime<Utc>) -> Result<()> {
        events::update_last_recreated_at(&self.pool, event_id, at).await
    }

    async fn mark_event_finished(&self, event_id: i64, at: DateTime<Utc>) -> Result<()> {
        events::mark_event_finished(&self.pool, event_id, at).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<()> {
        events::delete_event(&self.pool, event_id).await
    }

    async fn get_signups_for_event(&self, event_id: i64) -> Result<Vec<Signup>> {
        let rows = signups::get_signups_for_event(&self.pool, event_id).await?;
        rows.into_iter().map(|r| r.into_signup()).collect()
    }

    async fn set_rsvp(&self, event_id: i64, user_id: i64, status: RsvpStatus) -> Result<()> {
        signups::set_rsvp(&self.pool, event_id, user_id, status).await
    }

    async fn update_signup_role(
        &self,
        event_id: i64,
        user_id: i64,
        role_name: &str,
        subclass_name: Option<String>,
    ) -> Result<()> {
        signups::update_signup_role(
            &self.pool,
            event_id,
            user_id,
            role_name,
            subclass_name.as_deref(),
        )
        .await
    }

    async fn delete_squads_for_event(&self, event_id: i64) -> Result<()> {
        squads::delete_squads_for_event(&self.pool, event_id).await
    }

    async fn create_squad(&self, event_id: i64, name: &str, squad_type: &str) -> Result<i64> {
        squads::create_squad(&self.pool, event_id, name, squad_type).await
    }

    async fn add_squad_member(
        &self,
        squad_id: i64,
        user_id: i64,
        assigned_role_name: &str,
    ) -> Result<()> {
        squads::add_squad_member(&self.pool, squad_id, user_id, assigned_role_name).await
    }

    async fn get_squads_with_members(&self, event_id: i64) -> Result<Vec<SquadWithMembers>> {
        let squad_rows = squads::get_squads_for_event(&self.pool, event_id).await?;
        let member_rows = squads::get_members_for_event(&self.pool, event_id).await?;

        let mut result: Vec<SquadWithMembers> = squad_rows
            .into_iter()
            .map(|s| SquadWithMembers {
                squad: s.into(),
                members: Vec::new(),
            })
            .collect();

        for member in member_rows {
            if let Some(entry) = result
                .iter_mut()
                .find(|s| s.squad.squad_id == member.squad_id)
            {
                entry.members.push(member.into());
            }
        }

        Ok(result)
    }

    async fn get_guild_config(&self, guild_id: i64) -> Result<GuildConfig> {
        let row = guilds::get_guild_config(&self.pool, guild_id).await?;
        Ok(row
            .map(GuildConfig::from)
            .unwrap_or_else(|| GuildConfig::defaults(guild_id)))
    }

    async fn set_thread_hours(&self, guild_id: i64, hours: i64) -> Result<()> {
        guilds::set_thread_hours(&self.pool, guild_id, hours).await
    }

    async fn set_capability_role(
        &self,
        guild_id: i64,
        capability: CapabilityRole,
        role_id: i64,
    ) -> Result<()> {
        guilds::set_capability_role(&self.pool, guild_id, capability, role_id).await
    }

    async fn set_manager_role(&self, guild_id: i64, role_id: i64) -> Result<()> {
        guilds::set_manager_role(&self.pool, guild_id, role_id).await
    }
}
