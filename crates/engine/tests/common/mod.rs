use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockall::mock;
use muster_core::models::event::{Event, EventSummary};
use muster_core::models::signup::{RsvpStatus, Signup};
use muster_core::presence::{Presence, PresenceResult, SummaryStatus};

mock! {
    pub Presence {}

    #[async_trait]
    impl Presence for Presence {
        async fn post_summary(
            &self,
            channel_id: i64,
            summary: &EventSummary,
        ) -> PresenceResult<i64>;

        async fn fetch_summary(
            &self,
            channel_id: i64,
            message_id: i64,
        ) -> PresenceResult<SummaryStatus>;

        async fn edit_summary(
            &self,
            channel_id: i64,
            message_id: i64,
            summary: &EventSummary,
        ) -> PresenceResult<()>;

        async fn delete_summary(&self, channel_id: i64, message_id: i64) -> PresenceResult<()>;

        async fn create_discussion_space(
            &self,
            channel_id: i64,
            name: &str,
        ) -> PresenceResult<i64>;

        async fn delete_discussion_space(&self, space_id: i64) -> PresenceResult<()>;

        async fn list_space_members(&self, space_id: i64) -> PresenceResult<Vec<i64>>;

        async fn add_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()>;

        async fn remove_space_member(&self, space_id: i64, user_id: i64) -> PresenceResult<()>;

        async fn fetch_member_display_name(
            &self,
            guild_id: i64,
            user_id: i64,
        ) -> PresenceResult<String>;

        async fn fetch_member_role_ids(
            &self,
            guild_id: i64,
            user_id: i64,
        ) -> PresenceResult<Vec<i64>>;

        fn self_user_id(&self) -> i64;
    }
}

pub fn signup(event_id: i64, user_id: i64, status: RsvpStatus) -> Signup {
    Signup {
        event_id,
        user_id,
        rsvp_status: status,
        role_name: None,
        subclass_name: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn event_at(event_id: i64, start_time: DateTime<Utc>) -> Event {
    Event {
        event_id,
        guild_id: 1,
        channel_id: 2,
        creator_id: 3,
        title: "Friday Night Op".to_string(),
        description: "Bring a mic.".to_string(),
        start_time,
        end_time: None,
        timezone: "UTC".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        message_id: None,
        thread_id: None,
        thread_created: false,
        is_recurring: false,
        recurrence_rule: None,
        recreation_hours: 168,
        parent_event_id: None,
        last_recreated_at: None,
        deleted_at: None,
    }
}
