use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled community event.
///
/// `message_id` and `thread_id` point at externally-visible artifacts on the
/// messaging platform and are populated asynchronously after creation; the
/// reconciliation passes treat the database row as desired state and repair
/// the external side to match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub message_id: Option<i64>,
    pub thread_id: Option<i64>,
    pub thread_created: bool,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub recreation_hours: i64,
    pub parent_event_id: Option<i64>,
    pub last_recreated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Event {
    /// End of the event for gating purposes. Events without an explicit end
    /// are treated as ending at their start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_time.unwrap_or(self.start_time)
    }
}

/// Fields supplied when creating an event row, either by a user command or
/// by the recurrence pass cloning a parent into a new occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub timezone: String,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub recreation_hours: i64,
    pub parent_event_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// One accepted signup as shown on a posted summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub user_id: i64,
    pub display_name: String,
    pub role_name: Option<String>,
    pub subclass_name: Option<String>,
}

/// A render-ready snapshot of an event and its responses.
///
/// Built by the engine from Store data and handed to the Presence client,
/// which owns the actual embed formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: Event,
    pub accepted: Vec<SummaryEntry>,
    pub tentative: Vec<String>,
    pub declined: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub guild_id: i64,
    pub channel_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub recreation_hours: Option<i64>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub event_id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEventResponse {
    pub event: Event,
    pub accepted_count: usize,
    pub tentative_count: usize,
    pub declined_count: usize,
}
