use chrono::Utc;
use eyre::Result;
use muster_core::models::signup::RsvpStatus;
use sqlx::{Pool, Postgres};

use crate::models::DbSignup;

/// Signups in insertion order. Later passes and the draft planner depend on
/// this order as the only tie-break between volunteers.
pub async fn get_signups_for_event(
    pool: &Pool<Postgres>,
    event_id: i64,
) -> Result<Vec<DbSignup>> {
    tracing::debug!("Getting signups for event: {}", event_id);

    let signups = sqlx::query_as::<_, DbSignup>(
        r#"
        SELECT signup_id, event_id, user_id, rsvp_status, role_name, subclass_name, created_at
        FROM signups
        WHERE event_id = $1
        ORDER BY signup_id ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(signups)
}

/// Upserts one member's response. A repeated identical response is absorbed
/// by the conflict clause; any status other than Accepted clears the stored
/// role and subclass.
pub async fn set_rsvp(
    pool: &Pool<Postgres>,
    event_id: i64,
    user_id: i64,
    status: RsvpStatus,
) -> Result<()> {
    tracing::debug!(
        "Setting rsvp: event_id={}, user_id={}, status={}",
        event_id,
        user_id,
        status
    );

    sqlx::query(
        r#"
        INSERT INTO signups (event_id, user_id, rsvp_status, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (event_id, user_id) DO UPDATE
        SET rsvp_status = EXCLUDED.rsvp_status,
            role_name = CASE WHEN EXCLUDED.rsvp_status = 'Accepted' THEN signups.role_name ELSE NULL END,
            subclass_name = CASE WHEN EXCLUDED.rsvp_status = 'Accepted' THEN signups.subclass_name ELSE NULL END
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(status.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_signup_role(
    pool: &Pool<Postgres>,
    event_id: i64,
    user_id: i64,
    role_name: &str,
    subclass_name: Option<&str>,
) -> Result<()> {
    tracing::debug!(
        "Updating signup role: event_id={}, user_id={}, role={}",
        event_id,
        user_id,
        role_name
    );

    sqlx::query(
        r#"
        UPDATE signups
        SET role_name = $3, subclass_name = $4
        WHERE event_id = $1 AND user_id = $2 AND rsvp_status = 'Accepted'
        "#,
    )
    .bind(event_id)
    .bind(user_id)
    .bind(role_name)
    .bind(subclass_name)
    .execute(pool)
    .await?;

    Ok(())
}
