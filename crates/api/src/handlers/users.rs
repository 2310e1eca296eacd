use axum::{extract::State, http::HeaderMap, Json};
use std::sync::Arc;

use muster_core::{
    errors::MusterError,
    models::config::{AdminUser, CreateUserRequest, CreateUserResponse},
};

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    auth::require_admin(&state.db_pool, &headers).await?;

    let users = muster_db::repositories::users::list_users(&state.db_pool)
        .await
        .map_err(MusterError::Database)?;

    Ok(Json(users.into_iter().map(AdminUser::from).collect()))
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AppError> {
    auth::require_admin(&state.db_pool, &headers).await?;

    if payload.username.trim().is_empty() {
        return Err(MusterError::InvalidInput("username must not be empty".to_string()).into());
    }
    if payload.password.len() < 8 {
        return Err(
            MusterError::InvalidInput("password must be at least 8 characters".to_string()).into(),
        );
    }

    let exists =
        muster_db::repositories::users::username_exists(&state.db_pool, &payload.username)
            .await
            .map_err(MusterError::Database)?;
    if exists {
        return Err(MusterError::Conflict(format!(
            "username {} is already taken",
            payload.username
        ))
        .into());
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let user = muster_db::repositories::users::create_user(
        &state.db_pool,
        &payload.username,
        &password_hash,
        payload.is_admin,
    )
    .await
    .map_err(MusterError::Database)?;

    Ok(Json(CreateUserResponse {
        id: user.id,
        username: user.username,
        is_admin: user.is_admin,
    }))
}
