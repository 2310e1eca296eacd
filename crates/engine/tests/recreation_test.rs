mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::{event_at, MockPresence};
use muster_db::mock::MockStore;
use muster_engine::passes;

fn origin_weekly(start: chrono::DateTime<Utc>) -> muster_core::models::event::Event {
    let mut event = event_at(10, start);
    event.is_recurring = true;
    event.recurrence_rule = Some("weekly".to_string());
    event.recreation_hours = 168;
    event
}

#[tokio::test]
async fn test_first_occurrence_waits_for_recreation_window() {
    let start = Utc.with_ymd_and_hms(2025, 7, 25, 19, 0, 0).unwrap();
    // One hour before the 168h window opens.
    let now = start - Duration::hours(169);
    let origin = origin_weekly(start);

    let mut store = MockStore::new();
    store
        .expect_get_events_for_recreation()
        .returning(move |_, _| Ok(vec![origin.clone()]));
    store
        .expect_get_latest_child_event()
        .returning(|_| Ok(None));
    store.expect_create_event().times(0);
    store.expect_update_last_recreated_at().times(0);

    let presence = MockPresence::new();

    passes::recurrence::run(Arc::new(store), Arc::new(presence), now, Duration::hours(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_first_occurrence_fires_inside_recreation_window() {
    let start = Utc.with_ymd_and_hms(2025, 7, 25, 19, 0, 0).unwrap();
    // One hour after the 168h window opened.
    let now = start - Duration::hours(167);
    let origin = origin_weekly(start);
    let expected_start = start + Duration::days(7);

    let mut store = MockStore::new();
    store
        .expect_get_events_for_recreation()
        .returning(move |_, _| Ok(vec![origin.clone()]));
    store
        .expect_get_latest_child_event()
        .returning(|_| Ok(None));
    store
        .expect_create_event()
        .withf(move |_, _, _, fields| {
            fields.start_time == expected_start
                && fields.parent_event_id == Some(10)
                && !fields.is_recurring
                && fields.recurrence_rule.is_none()
        })
        .times(1)
        .returning(|_, _, _, _| Ok(43));
    store.expect_get_event().returning(move |id| {
        let mut child = event_at(id, expected_start);
        child.parent_event_id = Some(10);
        Ok(Some(child))
    });
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![]));
    store
        .expect_update_event_message_id()
        .withf(|event_id, message_id| *event_id == 43 && *message_id == 900)
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_update_last_recreated_at()
        .withf(|event_id, _| *event_id == 10)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut presence = MockPresence::new();
    presence
        .expect_post_summary()
        .times(1)
        .returning(|_, _| Ok(900));

    passes::recurrence::run(Arc::new(store), Arc::new(presence), now, Duration::hours(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_pending_child_suppresses_recreation() {
    let start = Utc.with_ymd_and_hms(2025, 7, 25, 19, 0, 0).unwrap();
    let now = start + Duration::days(3);
    let origin = origin_weekly(start);

    // The current occurrence has not ended yet.
    let mut child = event_at(43, start + Duration::days(7));
    child.parent_event_id = Some(10);

    let mut store = MockStore::new();
    store
        .expect_get_events_for_recreation()
        .returning(move |_, _| Ok(vec![origin.clone()]));
    store
        .expect_get_latest_child_event()
        .returning(move |_| Ok(Some(child.clone())));
    store.expect_create_event().times(0);
    store.expect_update_last_recreated_at().times(0);

    let presence = MockPresence::new();

    passes::recurrence::run(Arc::new(store), Arc::new(presence), now, Duration::hours(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_subsequent_occurrence_steps_from_latest_child() {
    let start = Utc.with_ymd_and_hms(2025, 7, 25, 19, 0, 0).unwrap();
    let child_start = start + Duration::days(7);
    // The latest child ended (no end_time, so its start is its end).
    let now = child_start + Duration::hours(2);
    let origin = origin_weekly(start);

    let mut child = event_at(43, child_start);
    child.parent_event_id = Some(10);

    let expected_next = child_start + Duration::days(7);

    let mut store = MockStore::new();
    store
        .expect_get_events_for_recreation()
        .returning(move |_, _| Ok(vec![origin.clone()]));
    store
        .expect_get_latest_child_event()
        .returning(move |_| Ok(Some(child.clone())));
    store
        .expect_create_event()
        .withf(move |_, _, _, fields| fields.start_time == expected_next)
        .times(1)
        .returning(|_, _, _, _| Ok(44));
    store.expect_get_event().returning(move |id| {
        let mut next = event_at(id, expected_next);
        next.parent_event_id = Some(10);
        Ok(Some(next))
    });
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![]));
    store
        .expect_update_event_message_id()
        .returning(|_, _| Ok(()));
    store
        .expect_update_last_recreated_at()
        .times(1)
        .returning(|_, _| Ok(()));

    let mut presence = MockPresence::new();
    presence
        .expect_post_summary()
        .times(1)
        .returning(|_, _| Ok(901));

    passes::recurrence::run(Arc::new(store), Arc::new(presence), now, Duration::hours(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stale_chain_catches_up_to_the_future() {
    let start = Utc.with_ymd_and_hms(2025, 7, 25, 19, 0, 0).unwrap();
    let child_start = start + Duration::days(7);
    // Three weeks of downtime; the next occurrence must land after now.
    let now = child_start + Duration::days(21) + Duration::hours(1);
    let origin = origin_weekly(start);

    let mut child = event_at(43, child_start);
    child.parent_event_id = Some(10);

    let expected_next = child_start + Duration::days(28);

    let mut store = MockStore::new();
    store
        .expect_get_events_for_recreation()
        .returning(move |_, _| Ok(vec![origin.clone()]));
    store
        .expect_get_latest_child_event()
        .returning(move |_| Ok(Some(child.clone())));
    store
        .expect_create_event()
        .withf(move |_, _, _, fields| fields.start_time == expected_next)
        .times(1)
        .returning(|_, _, _, _| Ok(44));
    store.expect_get_event().returning(move |id| {
        Ok(Some(event_at(id, expected_next)))
    });
    store
        .expect_get_signups_for_event()
        .returning(|_| Ok(vec![]));
    store
        .expect_update_event_message_id()
        .returning(|_, _| Ok(()));
    store
        .expect_update_last_recreated_at()
        .times(1)
        .returning(|_, _| Ok(()));

    let mut presence = MockPresence::new();
    presence
        .expect_post_summary()
        .times(1)
        .returning(|_, _| Ok(902));

    passes::recurrence::run(Arc::new(store), Arc::new(presence), now, Duration::hours(1))
        .await
        .unwrap();
}
