use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use muster_core::{
    errors::MusterError,
    models::event::{
        CreateEventRequest, CreateEventResponse, Event, EventUpdate, GetEventResponse, NewEvent,
        UpdateEventRequest,
    },
    models::signup::RsvpStatus,
};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub guild_id: i64,
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = muster_db::repositories::events::get_upcoming_events(
        &state.db_pool,
        query.guild_id,
        chrono::Utc::now(),
    )
    .await
    .map_err(MusterError::Database)?;

    Ok(Json(events.into_iter().map(Event::from).collect()))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(MusterError::InvalidInput("title must not be empty".to_string()).into());
    }
    if payload.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(MusterError::InvalidInput(format!(
            "unknown timezone: {}",
            payload.timezone
        ))
        .into());
    }
    if let Some(end) = payload.end_time {
        if end <= payload.start_time {
            return Err(
                MusterError::InvalidInput("end time must be after start time".to_string()).into(),
            );
        }
    }

    let fields = NewEvent {
        title: payload.title,
        description: payload.description,
        start_time: payload.start_time,
        end_time: payload.end_time,
        timezone: payload.timezone,
        is_recurring: payload.is_recurring,
        recurrence_rule: payload.recurrence_rule,
        recreation_hours: payload
            .recreation_hours
            .unwrap_or(muster_core::wizard::DEFAULT_RECREATION_HOURS),
        parent_event_id: None,
    };

    let event_id = muster_db::repositories::events::create_event(
        &state.db_pool,
        payload.guild_id,
        payload.channel_id,
        payload.creator_id,
        &fields,
    )
    .await
    .map_err(MusterError::Database)?;

    Ok(Json(CreateEventResponse {
        event_id,
        title: fields.title,
        start_time: fields.start_time,
    }))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<GetEventResponse>, AppError> {
    let event = fetch_event(&state, id).await?;

    let signups = muster_db::repositories::signups::get_signups_for_event(&state.db_pool, id)
        .await
        .map_err(MusterError::Database)?;

    let mut accepted_count = 0;
    let mut tentative_count = 0;
    let mut declined_count = 0;
    for signup in signups {
        match signup.into_signup()?.rsvp_status {
            RsvpStatus::Accepted => accepted_count += 1,
            RsvpStatus::Tentative => tentative_count += 1,
            RsvpStatus::Declined => declined_count += 1,
        }
    }

    Ok(Json(GetEventResponse {
        event,
        accepted_count,
        tentative_count,
        declined_count,
    }))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let existing = fetch_event(&state, id).await?;

    let update = EventUpdate {
        title: payload.title.unwrap_or(existing.title),
        description: payload.description.unwrap_or(existing.description),
        start_time: payload.start_time.unwrap_or(existing.start_time),
        end_time: payload.end_time.or(existing.end_time),
    };

    if update.title.trim().is_empty() {
        return Err(MusterError::InvalidInput("title must not be empty".to_string()).into());
    }
    if let Some(end) = update.end_time {
        if end <= update.start_time {
            return Err(
                MusterError::InvalidInput("end time must be after start time".to_string()).into(),
            );
        }
    }

    muster_db::repositories::events::update_event(&state.db_pool, id, &update)
        .await
        .map_err(MusterError::Database)?;

    let updated = fetch_event(&state, id).await?;
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    // 404 for events that were never created or already purged
    fetch_event(&state, id).await?;

    muster_db::repositories::events::delete_event(&state.db_pool, id)
        .await
        .map_err(MusterError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub(crate) async fn fetch_event(state: &ApiState, event_id: i64) -> Result<Event, AppError> {
    let event = muster_db::repositories::events::get_event(&state.db_pool, event_id)
        .await
        .map_err(MusterError::Database)?
        .ok_or_else(|| MusterError::NotFound(format!("Event {} not found", event_id)))?;

    Ok(event.into())
}
