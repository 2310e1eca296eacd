use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use mockall::mock;
use muster_core::models::config::{CapabilityRole, GuildConfig};
use muster_core::models::event::{Event, EventUpdate, NewEvent};
use muster_core::models::signup::{RsvpStatus, Signup};
use muster_core::models::squad::SquadWithMembers;
use muster_core::store::Store;

// Mock store for engine and handler tests.
mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
        async fn get_event(&self, event_id: i64) -> Result<Option<Event>>;

        async fn get_event_by_message_id(&self, message_id: i64) -> Result<Option<Event>>;

        async fn get_upcoming_events(&self, guild_id: i64) -> Result<Vec<Event>>;

        async fn get_events_for_thread_creation(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

        async fn get_events_for_recreation(
            &self,
            now: DateTime<Utc>,
            recheck_interval: Duration,
        ) -> Result<Vec<Event>>;

        async fn get_latest_child_event(&self, parent_event_id: i64) -> Result<Option<Event>>;

        async fn get_active_events_with_message_id(
            &self,
            now: DateTime<Utc>,
        ) -> Result<Vec<Event>>;

        async fn get_active_events_with_threads(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

        async fn get_past_events_with_tentatives(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

        async fn get_finished_events_for_cleanup(
            &self,
            now: DateTime<Utc>,
            grace: Duration,
        ) -> Result<Vec<Event>>;

        async fn get_events_for_purging(
            &self,
            now: DateTime<Utc>,
            retention: Duration,
        ) -> Result<Vec<Event>>;

        async fn create_event(
            &self,
            guild_id: i64,
            channel_id: i64,
            creator_id: i64,
            fields: NewEvent,
        ) -> Result<i64>;

        async fn update_event(&self, event_id: i64, update: EventUpdate) -> Result<()>;

        async fn update_event_message_id(&self, event_id: i64, message_id: i64) -> Result<()>;

        async fn set_event_thread(&self, event_id: i64, thread_id: i64) -> Result<()>;

        async fn mark_thread_created(&self, event_id: i64) -> Result<()>;

        async fn update_last_recreated_at(&self, event_id: i64, at: DateTime<Utc>) -> Result<()>;

        async fn mark_event_finished(&self, event_id: i64, at: DateTime<Utc>) -> Result<()>;

        async fn delete_event(&self, event_id: i64) -> Result<()>;

        async fn get_signups_for_event(&self, event_id: i64) -> Result<Vec<Signup>>;

        async fn set_rsvp(&self, event_id: i64, user_id: i64, status: RsvpStatus) -> Result<()>;

        async fn update_signup_role(
            &self,
            event_id: i64,
            user_id: i64,
            role_name: &str,
            subclass_name: Option<String>,
        ) -> Result<()>;

        async fn delete_squads_for_event(&self, event_id: i64) -> Result<()>;

        async fn create_squad(&self, event_id: i64, name: &str, squad_type: &str) -> Result<i64>;

        async fn add_squad_member(
            &self,
            squad_id: i64,
            user_id: i64,
            assigned_role_name: &str,
        ) -> Result<()>;

        async fn get_squads_with_members(&self, event_id: i64) -> Result<Vec<SquadWithMembers>>;

        async fn get_guild_config(&self, guild_id: i64) -> Result<GuildConfig>;

        async fn set_thread_hours(&self, guild_id: i64, hours: i64) -> Result<()>;

        async fn set_capability_role(
            &self,
            guild_id: i64,
            capability: CapabilityRole,
            role_id: i64,
        ) -> Result<()>;

        async fn set_manager_role(&self, guild_id: i64, role_id: i64) -> Result<()>;
    }
}
