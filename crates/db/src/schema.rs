use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            event_id BIGSERIAL PRIMARY KEY,
            guild_id BIGINT NOT NULL,
            channel_id BIGINT NOT NULL,
            creator_id BIGINT NOT NULL,
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            message_id BIGINT NULL,
            thread_id BIGINT NULL,
            thread_created BOOLEAN NOT NULL DEFAULT FALSE,
            is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
            recurrence_rule VARCHAR(32) NULL,
            recreation_hours BIGINT NOT NULL DEFAULT 168,
            parent_event_id BIGINT NULL REFERENCES events(event_id) ON DELETE SET NULL,
            last_recreated_at TIMESTAMP WITH TIME ZONE NULL,
            deleted_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create signups table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS signups (
            signup_id BIGSERIAL PRIMARY KEY,
            event_id BIGINT NOT NULL REFERENCES events(event_id) ON DELETE CASCADE,
            user_id BIGINT NOT NULL,
            rsvp_status VARCHAR(16) NOT NULL,
            role_name VARCHAR(64) NULL,
            subclass_name VARCHAR(64) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            UNIQUE (event_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create squads table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS squads (
            squad_id BIGSERIAL PRIMARY KEY,
            event_id BIGINT NOT NULL REFERENCES events(event_id) ON DELETE CASCADE,
            name VARCHAR(64) NOT NULL,
            squad_type VARCHAR(32) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create squad_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS squad_members (
            member_id BIGSERIAL PRIMARY KEY,
            squad_id BIGINT NOT NULL REFERENCES squads(squad_id) ON DELETE CASCADE,
            user_id BIGINT NOT NULL,
            assigned_role_name VARCHAR(64) NOT NULL,
            UNIQUE (squad_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create guild_config table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guild_config (
            guild_id BIGINT PRIMARY KEY,
            thread_hours BIGINT NOT NULL DEFAULT 24,
            attack_role_id BIGINT NULL,
            defence_role_id BIGINT NULL,
            artillery_role_id BIGINT NULL,
            armour_role_id BIGINT NULL,
            pathfinder_role_id BIGINT NULL,
            manager_role_id BIGINT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_guild_id ON events(guild_id);
        CREATE INDEX IF NOT EXISTS idx_events_start_time ON events(start_time);
        CREATE INDEX IF NOT EXISTS idx_events_message_id ON events(message_id);
        CREATE INDEX IF NOT EXISTS idx_events_parent_event_id ON events(parent_event_id);
        CREATE INDEX IF NOT EXISTS idx_signups_event_id ON signups(event_id);
        CREATE INDEX IF NOT EXISTS idx_signups_rsvp_status ON signups(rsvp_status);
        CREATE INDEX IF NOT EXISTS idx_squads_event_id ON squads(event_id);
        CREATE INDEX IF NOT EXISTS idx_squad_members_squad_id ON squad_members(squad_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
