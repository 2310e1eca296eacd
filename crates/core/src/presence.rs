use async_trait::async_trait;
use thiserror::Error;

use crate::models::event::EventSummary;

/// Failure modes of the external messaging platform, kept distinguishable so
/// the reconciliation passes can react differently to each: `NotFound`
/// triggers self-heal, `Forbidden` is logged and retried next cycle, and
/// `Transient` is retried on the next scheduled cycle with no in-cycle loop.
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("external object not found")]
    NotFound,

    #[error("permission denied by the platform")]
    Forbidden,

    #[error("transient platform failure: {0}")]
    Transient(String),
}

pub type PresenceResult<T> = Result<T, PresenceError>;

/// Outcome of probing a posted summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStatus {
    Found,
    Missing,
}

/// Operations against the externally-visible side of an event: the posted
/// summary message, its discussion space (thread), and the space roster.
///
/// Implemented over serenity in `muster-discord-bot`; the engine only ever
/// sees this trait. Every operation is fallible and failures are reported,
/// never swallowed.
#[async_trait]
pub trait Presence: Send + Sync {
    /// Posts a rendered event summary and returns the new message id. Also
    /// used to post the welcome sheet into a freshly created discussion
    /// space, since a space is addressable as a channel.
    async fn post_summary(&self, channel_id: i64, summary: &EventSummary) -> PresenceResult<i64>;

    async fn fetch_summary(&self, channel_id: i64, message_id: i64)
        -> PresenceResult<SummaryStatus>;

    async fn edit_summary(
        &self,
        channel_id: i64,
        message_id: i64,
        summary: &EventSummary,
    ) -> PresenceResult<()>;

    async fn delete_summary(&self, channel_id: i64, message_id: i64) -> PresenceResult<()>;

    async fn create_discussion_space(&self, channel_id: i64, name: &str) -> PresenceResult<i64>;

    async fn delete_discussion_space(&self, space_id: i64) -> PresenceResult<()>;

    async fn list_space_members(&self, space_id: i64) -> PresenceResult<Vec<i64>>;

    async fn add_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()>;

    async fn remove_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()>;

    async fn fetch_member_display_name(&self, guild_id: i64, user_id: i64)
        -> PresenceResult<String>;

    /// Platform role ids carried by a member; the draft classifier resolves
    /// these against the guild's configured capability roles.
    async fn fetch_member_role_ids(&self, guild_id: i64, user_id: i64) -> PresenceResult<Vec<i64>>;

    /// The service's own identity on the platform. Membership sync must
    /// never remove it from a discussion space.
    fn self_user_id(&self) -> i64;
}
