use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;

use crate::models::config::{CapabilityRole, GuildConfig};
use crate::models::event::{Event, EventUpdate, NewEvent};
use crate::models::signup::{RsvpStatus, Signup};
use crate::models::squad::SquadWithMembers;

/// Typed operations against the persisted event/signup/squad/config records.
///
/// The reconciliation engine and the user-facing surfaces depend on this
/// trait rather than on a concrete pool, so the Postgres implementation in
/// `muster-db` can be swapped for a mock in tests. All query methods read
/// fresh state; nothing is cached across calls.
#[async_trait]
pub trait Store: Send + Sync {
    // ------- events -------

    async fn get_event(&self, event_id: i64) -> Result<Option<Event>>;

    async fn get_event_by_message_id(&self, message_id: i64) -> Result<Option<Event>>;

    /// Non-deleted events with a start time in the future, soonest first.
    async fn get_upcoming_events(&self, guild_id: i64) -> Result<Vec<Event>>;

    /// Events whose thread flag is unset and whose thread window (per guild
    /// `thread_hours`) has opened.
    async fn get_events_for_thread_creation(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Recurring origin events eligible for recreation, filtered by the
    /// `last_recreated_at` recheck gate.
    async fn get_events_for_recreation(
        &self,
        now: DateTime<Utc>,
        recheck_interval: chrono::Duration,
    ) -> Result<Vec<Event>>;

    /// The most recently created occurrence of a recurrence chain, if any.
    async fn get_latest_child_event(&self, parent_event_id: i64) -> Result<Option<Event>>;

    /// Active (non-deleted, not yet finished) events carrying a message id.
    async fn get_active_events_with_message_id(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Active events with a created discussion thread.
    async fn get_active_events_with_threads(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Events whose start has passed and which still carry Tentative signups.
    async fn get_past_events_with_tentatives(&self, now: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Events finished longer than `grace` ago and not yet soft-deleted.
    async fn get_finished_events_for_cleanup(
        &self,
        now: DateTime<Utc>,
        grace: chrono::Duration,
    ) -> Result<Vec<Event>>;

    /// Soft-deleted events older than the purge window.
    async fn get_events_for_purging(
        &self,
        now: DateTime<Utc>,
        retention: chrono::Duration,
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

    /// Soft-deletes an event after cleanup; a second call is a no-op.
    async fn mark_event_finished(&self, event_id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Hard delete; cascades to signups, squads, and squad members. Deleting
    /// an already-deleted row is a no-op.
    async fn delete_event(&self, event_id: i64) -> Result<()>;

    // ------- signups -------

    /// Signups in insertion order; the draft planner relies on this order as
    /// its only tie-break.
    async fn get_signups_for_event(&self, event_id: i64) -> Result<Vec<Signup>>;

    /// Upserts the response. Any status other than `Accepted` clears the
    /// stored role and subclass.
    async fn set_rsvp(&self, event_id: i64, user_id: i64, status: RsvpStatus) -> Result<()>;

    async fn update_signup_role(
        &self,
        event_id: i64,
        user_id: i64,
        role_name: &str,
        subclass_name: Option<String>,
    ) -> Result<()>;

    // ------- squads -------

    async fn delete_squads_for_event(&self, event_id: i64) -> Result<()>;

    async fn create_squad(&self, event_id: i64, name: &str, squad_type: &str) -> Result<i64>;

    /// Duplicate (squad, user) pairs update the assigned role instead of
    /// failing; the conflict means the member is already in desired state.
    async fn add_squad_member(
        &self,
        squad_id: i64,
        user_id: i64,
        assigned_role_name: &str,
    ) -> Result<()>;

    async fn get_squads_with_members(&self, event_id: i64) -> Result<Vec<SquadWithMembers>>;

    // ------- guild configuration -------

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
