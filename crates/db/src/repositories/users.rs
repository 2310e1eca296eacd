use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbUser;

pub async fn create_user(
    pool: &Pool<Postgres>,
    username: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<DbUser> {
    tracing::debug!("Creating user: username={}, is_admin={}", username, is_admin);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (username, password_hash, is_admin)
        VALUES ($1, $2, $3)
        RETURNING id, username, password_hash, is_active, is_admin, created_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, password_hash, is_active, is_admin, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list_users(pool: &Pool<Postgres>) -> Result<Vec<DbUser>> {
    let users = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, password_hash, is_active, is_admin, created_at
        FROM users
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn username_exists(pool: &Pool<Postgres>, username: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
