use chrono::{TimeZone, Utc};
use muster_core::models::event::{CreateEventRequest, Event, EventSummary, SummaryEntry};
use muster_core::models::signup::{RsvpStatus, SetRsvpRequest, RESTRICTED_ROLES};
use muster_core::models::squad::CapacityRequest;
use pretty_assertions::assert_eq;

fn sample_event() -> Event {
    Event {
        event_id: 10,
        guild_id: 1,
        channel_id: 2,
        creator_id: 3,
        title: "Friday Night Op".to_string(),
        description: "Bring a mic.".to_string(),
        start_time: Utc.with_ymd_and_hms(2025, 7, 18, 19, 0, 0).unwrap(),
        end_time: None,
        timezone: "Europe/Berlin".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
        message_id: Some(555),
        thread_id: None,
        thread_created: false,
        is_recurring: true,
        recurrence_rule: Some("weekly".to_string()),
        recreation_hours: 168,
        parent_event_id: None,
        last_recreated_at: None,
        deleted_at: None,
    }
}

#[test]
fn test_effective_end_falls_back_to_start() {
    let mut event = sample_event();
    assert_eq!(event.effective_end(), event.start_time);

    let end = Utc.with_ymd_and_hms(2025, 7, 18, 21, 0, 0).unwrap();
    event.end_time = Some(end);
    assert_eq!(event.effective_end(), end);
}

#[test]
fn test_rsvp_status_round_trip() {
    for status in [RsvpStatus::Accepted, RsvpStatus::Tentative, RsvpStatus::Declined] {
        assert_eq!(RsvpStatus::parse(status.as_str()).unwrap(), status);
    }
    assert!(RsvpStatus::parse("maybe").is_err());
}

#[test]
fn test_create_event_request_deserializes_with_optional_fields() {
    let json = r#"{
        "guild_id": 1,
        "channel_id": 2,
        "creator_id": 3,
        "title": "Friday Night Op",
        "description": "Bring a mic.",
        "start_time": "2025-07-18T19:00:00Z",
        "timezone": "Europe/Berlin"
    }"#;

    let request: CreateEventRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.title, "Friday Night Op");
    assert_eq!(request.end_time, None);
    assert_eq!(request.recurrence_rule, None);
}

#[test]
fn test_set_rsvp_request_deserializes() {
    let json = r#"{"status": "Tentative", "role_name": null, "subclass_name": null}"#;
    let request: SetRsvpRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.status, RsvpStatus::Tentative);
    assert_eq!(request.role_name, None);
}

#[test]
fn test_capacity_request_serde_defaults() {
    let json = r#"{"infantry_squad_size": 6, "attack_squads": 2}"#;
    let request: CapacityRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.infantry_squad_size, 6);
    assert_eq!(request.attack_squads, 2);
    assert_eq!(request.armour_squads, 0);
    assert!(request.validate().is_ok());
}

#[test]
fn test_event_summary_serializes_groups() {
    let summary = EventSummary {
        event: sample_event(),
        accepted: vec![SummaryEntry {
            user_id: 7,
            display_name: "Alice".to_string(),
            role_name: Some("Commander".to_string()),
            subclass_name: None,
        }],
        tentative: vec!["Bob".to_string()],
        declined: vec![],
    };

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["accepted"][0]["display_name"], "Alice");
    assert_eq!(value["tentative"][0], "Bob");
}

#[test]
fn test_restricted_roles_are_single_seat() {
    for role in RESTRICTED_ROLES {
        assert!(
            ["Commander", "Recon", "Officer", "Tank Commander"].contains(role),
            "unexpected restricted role {role}"
        );
    }
    assert_eq!(RESTRICTED_ROLES.len(), 4);
}
