use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use muster_core::{
    errors::MusterError,
    models::signup::{RsvpStatus, Signup},
    models::squad::{CapacityRequest, SquadWithMembers, Volunteer},
};
use muster_db::PgStore;

use crate::{handlers::events::fetch_event, middleware::error_handling::AppError, ApiState};

/// Export payload combining an event's signups and its drafted squads.
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub event_id: i64,
    pub signups: Vec<Signup>,
    pub squads: Vec<SquadWithMembers>,
}

/// Runs a squad draft from the event's accepted signups.
///
/// Volunteers are classified from their stored role and subclass only;
/// capability tags come from platform roles the API cannot observe, so
/// they stay at their defaults on this path.
#[axum::debug_handler]
pub async fn run_draft(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(capacity): Json<CapacityRequest>,
) -> Result<Json<Vec<SquadWithMembers>>, AppError> {
    fetch_event(&state, id).await?;

    let rows = muster_db::repositories::signups::get_signups_for_event(&state.db_pool, id)
        .await
        .map_err(MusterError::Database)?;

    let mut volunteers = Vec::new();
    for row in rows {
        let signup = row.into_signup()?;
        if signup.rsvp_status != RsvpStatus::Accepted {
            continue;
        }
        volunteers.push(Volunteer {
            user_id: signup.user_id,
            display_name: signup.user_id.to_string(),
            role_name: signup.role_name,
            subclass_name: signup.subclass_name,
            tags: Default::default(),
        });
    }

    let store = PgStore::new(state.db_pool.clone());
    let squads = muster_engine::draft::run_draft(&store, id, volunteers, &capacity)
        .await
        .map_err(AppError)?;

    Ok(Json(squads))
}

#[axum::debug_handler]
pub async fn list_squads(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SquadWithMembers>>, AppError> {
    fetch_event(&state, id).await?;

    let squads = fetch_squads(&state, id).await?;
    Ok(Json(squads))
}

#[axum::debug_handler]
pub async fn get_roster(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<RosterResponse>, AppError> {
    fetch_event(&state, id).await?;

    let rows = muster_db::repositories::signups::get_signups_for_event(&state.db_pool, id)
        .await
        .map_err(MusterError::Database)?;
    let mut signups = Vec::with_capacity(rows.len());
    for row in rows {
        signups.push(row.into_signup()?);
    }

    let squads = fetch_squads(&state, id).await?;

    Ok(Json(RosterResponse {
        event_id: id,
        signups,
        squads,
    }))
}

async fn fetch_squads(state: &ApiState, event_id: i64) -> Result<Vec<SquadWithMembers>, AppError> {
    use muster_core::store::Store;

    let store = PgStore::new(state.db_pool.clone());
    let squads = store
        .get_squads_with_members(event_id)
        .await
        .map_err(MusterError::Database)?;

    Ok(squads)
}
