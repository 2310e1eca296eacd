mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::{event_at, signup, MockPresence};
use muster_core::models::signup::RsvpStatus;
use muster_core::presence::{PresenceError, SummaryStatus};
use muster_db::mock::MockStore;
use muster_engine::passes;

#[tokio::test]
async fn test_self_heal_leaves_present_summaries_alone() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now + Duration::hours(5));
    event.message_id = Some(555);

    let mut store = MockStore::new();
    store
        .expect_get_active_events_with_message_id()
        .returning(move |_| Ok(vec![event.clone()]));
    store.expect_update_event_message_id().times(0);

    let mut presence = MockPresence::new();
    presence
        .expect_fetch_summary()
        .returning(|_, _| Ok(SummaryStatus::Found));
    presence.expect_post_summary().times(0);

    passes::self_heal::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_self_heal_reposts_missing_summary() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now + Duration::hours(5));
    event.message_id = Some(555);

    let mut store = MockStore::new();
    store
        .expect_get_active_events_with_message_id()
        .returning(move |_| Ok(vec![event.clone()]));
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![]));
    store
        .expect_update_event_message_id()
        .withf(|event_id, message_id| *event_id == 10 && *message_id == 999)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut presence = MockPresence::new();
    presence
        .expect_fetch_summary()
        .returning(|_, _| Ok(SummaryStatus::Missing));
    presence
        .expect_post_summary()
        .times(1)
        .returning(|_, _| Ok(999));

    passes::self_heal::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_thread_pass_leaves_flag_untouched_on_creation_failure() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let event = event_at(10, now + Duration::hours(5));

    let mut store = MockStore::new();
    store
        .expect_get_events_for_thread_creation()
        .returning(move |_| Ok(vec![event.clone()]));
    store.expect_set_event_thread().times(0);
    store.expect_mark_thread_created().times(0);

    let mut presence = MockPresence::new();
    presence
        .expect_create_discussion_space()
        .returning(|_, _| Err(PresenceError::Transient("rate limited".to_string())));

    passes::threads::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_thread_pass_creates_space_and_seeds_members() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let event = event_at(10, now + Duration::hours(5));

    let mut store = MockStore::new();
    store
        .expect_get_events_for_thread_creation()
        .returning(move |_| Ok(vec![event.clone()]));
    store
        .expect_set_event_thread()
        .withf(|event_id, thread_id| *event_id == 10 && *thread_id == 777)
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_mark_thread_created()
        .withf(|event_id| *event_id == 10)
        .times(1)
        .returning(|_| Ok(()));
    store.expect_get_signups_for_event().returning(|_| {
        Ok(vec![
            signup(10, 100, RsvpStatus::Accepted),
            signup(10, 101, RsvpStatus::Declined),
        ])
    });

    let mut presence = MockPresence::new();
    presence
        .expect_create_discussion_space()
        .times(1)
        .returning(|_, _| Ok(777));
    presence
        .expect_add_space_member()
        .withf(|space_id, user_id| *space_id == 777 && *user_id == 100)
        .times(1)
        .returning(|_, _| Ok(()));
    presence
        .expect_fetch_member_display_name()
        .returning(|_, _| Ok("Alice".to_string()));
    presence
        .expect_post_summary()
        .withf(|channel_id, _| *channel_id == 777)
        .times(1)
        .returning(|_, _| Ok(888));

    passes::threads::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_membership_sync_converges_and_spares_self() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now + Duration::hours(5));
    event.thread_id = Some(777);
    event.thread_created = true;

    let mut store = MockStore::new();
    store
        .expect_get_active_events_with_threads()
        .returning(move |_| Ok(vec![event.clone()]));
    store.expect_get_signups_for_event().returning(|_| {
        Ok(vec![
            signup(10, 2, RsvpStatus::Accepted),
            signup(10, 3, RsvpStatus::Accepted),
            signup(10, 4, RsvpStatus::Tentative),
        ])
    });

    let mut presence = MockPresence::new();
    presence
        .expect_list_space_members()
        .returning(|_| Ok(vec![1, 2, 99]));
    presence.expect_self_user_id().return_const(99_i64);
    presence
        .expect_add_space_member()
        .withf(|_, user_id| *user_id == 3)
        .times(1)
        .returning(|_, _| Ok(()));
    presence
        .expect_remove_space_member()
        .withf(|_, user_id| *user_id == 1)
        .times(1)
        .returning(|_, _| Ok(()));

    passes::membership::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_membership_sync_is_idempotent_when_converged() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now + Duration::hours(5));
    event.thread_id = Some(777);
    event.thread_created = true;

    let mut store = MockStore::new();
    store
        .expect_get_active_events_with_threads()
        .returning(move |_| Ok(vec![event.clone()]));
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![signup(10, 2, RsvpStatus::Accepted)]));

    let mut presence = MockPresence::new();
    presence
        .expect_list_space_members()
        .returning(|_| Ok(vec![2, 99]));
    presence.expect_self_user_id().return_const(99_i64);
    presence.expect_add_space_member().times(0);
    presence.expect_remove_space_member().times(0);

    passes::membership::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_tentative_aging_declines_only_tentatives() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let event = event_at(10, now - Duration::hours(1));

    let mut store = MockStore::new();
    store
        .expect_get_past_events_with_tentatives()
        .returning(move |_| Ok(vec![event.clone()]));
    store.expect_get_signups_for_event().returning(|_| {
        Ok(vec![
            signup(10, 2, RsvpStatus::Accepted),
            signup(10, 3, RsvpStatus::Tentative),
            signup(10, 4, RsvpStatus::Declined),
        ])
    });
    store
        .expect_set_rsvp()
        .withf(|event_id, user_id, status| {
            *event_id == 10 && *user_id == 3 && *status == RsvpStatus::Declined
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    passes::tentative::run(Arc::new(store), now).await.unwrap();
}

#[tokio::test]
async fn test_tentative_aging_second_run_is_noop() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();

    let mut store = MockStore::new();
    store
        .expect_get_past_events_with_tentatives()
        .returning(|_| Ok(vec![]));
    store.expect_set_rsvp().times(0);

    passes::tentative::run(Arc::new(store), now).await.unwrap();
}

#[tokio::test]
async fn test_retention_treats_missing_artifacts_as_cleaned() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now - Duration::days(2));
    event.message_id = Some(555);
    event.thread_id = Some(777);

    let mut store = MockStore::new();
    store
        .expect_get_finished_events_for_cleanup()
        .returning(move |_, _| Ok(vec![event.clone()]));
    store
        .expect_mark_event_finished()
        .withf(|event_id, _| *event_id == 10)
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_get_events_for_purging()
        .returning(|_, _| Ok(vec![]));
    store.expect_delete_event().times(0);

    let mut presence = MockPresence::new();
    presence
        .expect_delete_summary()
        .returning(|_, _| Err(PresenceError::NotFound));
    presence
        .expect_delete_discussion_space()
        .returning(|_| Ok(()));

    passes::retention::run(
        Arc::new(store),
        Arc::new(presence),
        now,
        Duration::hours(1),
        Duration::days(30),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_retention_purges_expired_soft_deletes() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut event = event_at(10, now - Duration::days(60));
    event.deleted_at = Some(now - Duration::days(45));

    let mut store = MockStore::new();
    store
        .expect_get_finished_events_for_cleanup()
        .returning(|_, _| Ok(vec![]));
    store
        .expect_get_events_for_purging()
        .returning(move |_, _| Ok(vec![event.clone()]));
    store
        .expect_delete_event()
        .withf(|event_id| *event_id == 10)
        .times(1)
        .returning(|_| Ok(()));

    let presence = MockPresence::new();

    passes::retention::run(
        Arc::new(store),
        Arc::new(presence),
        now,
        Duration::hours(1),
        Duration::days(30),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_retention_spares_live_recurring_origins() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let mut origin = event_at(10, now - Duration::days(2));
    origin.is_recurring = true;
    origin.recurrence_rule = Some("weekly".to_string());
    let finished = event_at(11, now - Duration::days(2));

    let mut store = MockStore::new();
    store
        .expect_get_finished_events_for_cleanup()
        .returning(move |_, _| Ok(vec![origin.clone(), finished.clone()]));
    store
        .expect_mark_event_finished()
        .withf(|event_id, _| *event_id == 10)
        .times(0);
    store
        .expect_mark_event_finished()
        .withf(|event_id, _| *event_id == 11)
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_get_events_for_purging()
        .returning(|_, _| Ok(vec![]));

    let presence = MockPresence::new();

    passes::retention::run(
        Arc::new(store),
        Arc::new(presence),
        now,
        Duration::hours(1),
        Duration::days(30),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_tentative_aging_continues_past_failing_event() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let broken = event_at(10, now - Duration::hours(2));
    let healthy = event_at(11, now - Duration::hours(1));

    let mut store = MockStore::new();
    store
        .expect_get_past_events_with_tentatives()
        .returning(move |_| Ok(vec![broken.clone(), healthy.clone()]));
    store
        .expect_get_signups_for_event()
        .returning(|event_id| Ok(vec![signup(event_id, 3, RsvpStatus::Tentative)]));
    store
        .expect_set_rsvp()
        .withf(|event_id, _, _| *event_id == 10)
        .times(1)
        .returning(|_, _, _| Err(eyre::eyre!("connection reset")));
    store
        .expect_set_rsvp()
        .withf(|event_id, user_id, status| {
            *event_id == 11 && *user_id == 3 && *status == RsvpStatus::Declined
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    passes::tentative::run(Arc::new(store), now).await.unwrap();
}

#[tokio::test]
async fn test_thread_pass_continues_past_failing_event() {
    let now = Utc.with_ymd_and_hms(2025, 7, 18, 12, 0, 0).unwrap();
    let broken = event_at(10, now + Duration::hours(5));
    let healthy = event_at(11, now + Duration::hours(6));

    let mut store = MockStore::new();
    store
        .expect_get_events_for_thread_creation()
        .returning(move |_| Ok(vec![broken.clone(), healthy.clone()]));
    store
        .expect_set_event_thread()
        .withf(|event_id, _| *event_id == 10)
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("connection reset")));
    store
        .expect_set_event_thread()
        .withf(|event_id, _| *event_id == 11)
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_mark_thread_created()
        .withf(|event_id| *event_id == 11)
        .times(1)
        .returning(|_| Ok(()));
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![]));

    let mut presence = MockPresence::new();
    presence
        .expect_create_discussion_space()
        .times(2)
        .returning(|_, _| Ok(777));
    presence.expect_post_summary().returning(|_, _| Ok(888));

    passes::threads::run(Arc::new(store), Arc::new(presence), now)
        .await
        .unwrap();
}
