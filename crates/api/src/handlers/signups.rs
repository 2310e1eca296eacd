use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use muster_core::{
    errors::MusterError,
    models::signup::{subclasses_for, RsvpStatus, SetRsvpRequest, Signup, PRIMARY_ROLES},
};

use crate::{handlers::events::fetch_event, middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_signups(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Signup>>, AppError> {
    fetch_event(&state, id).await?;

    let rows = muster_db::repositories::signups::get_signups_for_event(&state.db_pool, id)
        .await
        .map_err(MusterError::Database)?;

    let mut signups = Vec::with_capacity(rows.len());
    for row in rows {
        signups.push(row.into_signup()?);
    }

    Ok(Json(signups))
}

#[axum::debug_handler]
pub async fn set_rsvp(
    State(state): State<Arc<ApiState>>,
    Path((id, user_id)): Path<(i64, i64)>,
    Json(payload): Json<SetRsvpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    fetch_event(&state, id).await?;

    if payload.status == RsvpStatus::Accepted {
        validate_role_choice(&payload)?;
    } else if payload.role_name.is_some() || payload.subclass_name.is_some() {
        return Err(MusterError::InvalidInput(
            "role and subclass only apply to accepted signups".to_string(),
        )
        .into());
    }

    muster_db::repositories::signups::set_rsvp(&state.db_pool, id, user_id, payload.status)
        .await
        .map_err(MusterError::Database)?;

    if payload.status == RsvpStatus::Accepted {
        if let Some(role_name) = &payload.role_name {
            muster_db::repositories::signups::update_signup_role(
                &state.db_pool,
                id,
                user_id,
                role_name,
                payload.subclass_name.as_deref(),
            )
            .await
            .map_err(MusterError::Database)?;
        }
    }

    Ok(Json(serde_json::json!({
        "event_id": id,
        "user_id": user_id,
        "status": payload.status,
    })))
}

/// The web surface enforces the same role catalogue as the bot. Restricted
/// seats are not gated here: platform role checks need gateway data the API
/// does not have, so restricted-seat enforcement stays on the bot surface.
fn validate_role_choice(payload: &SetRsvpRequest) -> Result<(), MusterError> {
    let Some(role_name) = &payload.role_name else {
        if payload.subclass_name.is_some() {
            return Err(MusterError::InvalidInput(
                "subclass requires a role".to_string(),
            ));
        }
        return Ok(());
    };

    if !PRIMARY_ROLES.contains(&role_name.as_str()) {
        return Err(MusterError::InvalidInput(format!(
            "unknown role: {}",
            role_name
        )));
    }

    if let Some(subclass) = &payload.subclass_name {
        match subclasses_for(role_name) {
            Some(valid) if valid.contains(&subclass.as_str()) => {}
            Some(_) => {
                return Err(MusterError::InvalidInput(format!(
                    "{} is not a {} subclass",
                    subclass, role_name
                )));
            }
            None => {
                return Err(MusterError::InvalidInput(format!(
                    "{} does not take a subclass",
                    role_name
                )));
            }
        }
    }

    Ok(())
}
