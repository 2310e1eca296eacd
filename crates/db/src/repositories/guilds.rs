use eyre::Result;
use muster_core::models::config::CapabilityRole;
use sqlx::{Pool, Postgres};

use crate::models::DbGuildConfig;

pub async fn get_guild_config(
    pool: &Pool<Postgres>,
    guild_id: i64,
) -> Result<Option<DbGuildConfig>> {
    let config = sqlx::query_as::<_, DbGuildConfig>(
        r#"
        SELECT guild_id, thread_hours, attack_role_id, defence_role_id,
               artillery_role_id, armour_role_id, pathfinder_role_id, manager_role_id
        FROM guild_config
        WHERE guild_id = $1
        "#,
    )
    .bind(guild_id)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

pub async fn set_thread_hours(pool: &Pool<Postgres>, guild_id: i64, hours: i64) -> Result<()> {
    tracing::debug!("Setting thread_hours: guild_id={}, hours={}", guild_id, hours);

    sqlx::query(
        r#"
        INSERT INTO guild_config (guild_id, thread_hours)
        VALUES ($1, $2)
        ON CONFLICT (guild_id) DO UPDATE SET thread_hours = EXCLUDED.thread_hours
        "#,
    )
    .bind(guild_id)
    .bind(hours)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_capability_role(
    pool: &Pool<Postgres>,
    guild_id: i64,
    capability: CapabilityRole,
    role_id: i64,
) -> Result<()> {
    tracing::debug!(
        "Setting capability role: guild_id={}, capability={}, role_id={}",
        guild_id,
        capability.as_str(),
        role_id
    );

    // Column name comes from a closed enum, never from user input.
    let column = match capability {
        CapabilityRole::Attack => "attack_role_id",
        CapabilityRole::Defence => "defence_role_id",
        CapabilityRole::Artillery => "artillery_role_id",
        CapabilityRole::Armour => "armour_role_id",
        CapabilityRole::Pathfinder => "pathfinder_role_id",
    };

    sqlx::query(&format!(
        "INSERT INTO guild_config (guild_id, {column}) VALUES ($1, $2) \
         ON CONFLICT (guild_id) DO UPDATE SET {column} = EXCLUDED.{column}"
    ))
    .bind(guild_id)
    .bind(role_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_manager_role(pool: &Pool<Postgres>, guild_id: i64, role_id: i64) -> Result<()> {
    tracing::debug!("Setting manager role: guild_id={}, role_id={}", guild_id, role_id);

    sqlx::query(
        r#"
        INSERT INTO guild_config (guild_id, manager_role_id)
        VALUES ($1, $2)
        ON CONFLICT (guild_id) DO UPDATE SET manager_role_id = EXCLUDED.manager_role_id
        "#,
    )
    .bind(guild_id)
    .bind(role_id)
    .execute(pool)
    .await?;

    Ok(())
}
