use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::{DbSquad, DbSquadMember};

/// Removes every squad for the event; squad members go with them via the
/// cascade. A rebuild always starts from a clean slate.
pub async fn delete_squads_for_event(pool: &Pool<Postgres>, event_id: i64) -> Result<()> {
    tracing::debug!("Deleting squads for event: {}", event_id);

    sqlx::query("DELETE FROM squads WHERE event_id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_squad(
    pool: &Pool<Postgres>,
    event_id: i64,
    name: &str,
    squad_type: &str,
) -> Result<i64> {
    tracing::debug!(
        "Creating squad: event_id={}, name={}, type={}",
        event_id,
        name,
        squad_type
    );

    let squad_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO squads (event_id, name, squad_type)
        VALUES ($1, $2, $3)
        RETURNING squad_id
        "#,
    )
    .bind(event_id)
    .bind(name)
    .bind(squad_type)
    .fetch_one(pool)
    .await?;

    Ok(squad_id)
}

/// A duplicate (squad, user) pair updates the assigned role instead of
/// failing; the member is already where the plan wants them.
pub async fn add_squad_member(
    pool: &Pool<Postgres>,
    squad_id: i64,
    user_id: i64,
    assigned_role_name: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO squad_members (squad_id, user_id, assigned_role_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (squad_id, user_id) DO UPDATE
        SET assigned_role_name = EXCLUDED.assigned_role_name
        "#,
    )
    .bind(squad_id)
    .bind(user_id)
    .bind(assigned_role_name)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_squads_for_event(pool: &Pool<Postgres>, event_id: i64) -> Result<Vec<DbSquad>> {
    let squads = sqlx::query_as::<_, DbSquad>(
        r#"
        SELECT squad_id, event_id, name, squad_type, created_at
        FROM squads
        WHERE event_id = $1
        ORDER BY squad_id ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(squads)
}

pub async fn get_members_for_event(
    pool: &Pool<Postgres>,
    event_id: i64,
) -> Result<Vec<DbSquadMember>> {
    let members = sqlx::query_as::<_, DbSquadMember>(
        r#"
        SELECT m.member_id, m.squad_id, m.user_id, m.assigned_role_name
        FROM squad_members m
        JOIN squads s ON s.squad_id = m.squad_id
        WHERE s.event_id = $1
        ORDER BY m.member_id ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}
