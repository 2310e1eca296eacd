use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use muster_core::models::event::{EventUpdate, NewEvent};
use sqlx::{Pool, Postgres};

use crate::models::DbEvent;

const EVENT_COLUMNS: &str = "event_id, guild_id, channel_id, creator_id, title, description, \
     start_time, end_time, timezone, created_at, message_id, thread_id, thread_created, \
     is_recurring, recurrence_rule, recreation_hours, parent_event_id, last_recreated_at, \
     deleted_at";

pub async fn get_event(pool: &Pool<Postgres>, event_id: i64) -> Result<Option<DbEvent>> {
    tracing::debug!("Getting event by id: {}", event_id);

    let event = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
    ))
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn get_event_by_message_id(
    pool: &Pool<Postgres>,
    message_id: i64,
) -> Result<Option<DbEvent>> {
    tracing::debug!("Getting event by message id: {}", message_id);

    let event = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE message_id = $1 AND deleted_at IS NULL"
    ))
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn get_upcoming_events(
    pool: &Pool<Postgres>,
    guild_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<DbEvent>> {
    tracing::debug!("Getting upcoming events for guild: {}", guild_id);

    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE guild_id = $1 AND deleted_at IS NULL AND start_time > $2 \
         ORDER BY start_time ASC"
    ))
    .bind(guild_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Events whose discussion thread should exist but does not yet. The window
/// opens `thread_hours` (per guild, default 24) before the start and has no
/// upper bound: an event whose start already passed still gets its thread,
/// so downtime across a start time does not leave the event without one.
pub async fn get_events_for_thread_creation(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {} FROM events e \
         LEFT JOIN guild_config g ON g.guild_id = e.guild_id \
         WHERE e.deleted_at IS NULL \
           AND e.thread_created = FALSE \
           AND e.start_time - make_interval(hours => COALESCE(g.thread_hours, 24)::int) <= $1 \
         ORDER BY e.start_time ASC",
        qualified_columns("e")
    ))
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Recurring origin events whose recheck gate has elapsed. Window gating
/// against the latest occurrence happens in the caller.
pub async fn get_events_for_recreation(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
    recheck_interval: Duration,
) -> Result<Vec<DbEvent>> {
    let recheck_cutoff = now - recheck_interval;

    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE deleted_at IS NULL \
           AND is_recurring = TRUE \
           AND recurrence_rule IS NOT NULL \
           AND parent_event_id IS NULL \
           AND (last_recreated_at IS NULL OR last_recreated_at <= $1) \
         ORDER BY event_id ASC"
    ))
    .bind(recheck_cutoff)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn get_latest_child_event(
    pool: &Pool<Postgres>,
    parent_event_id: i64,
) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE parent_event_id = $1 \
         ORDER BY event_id DESC LIMIT 1"
    ))
    .bind(parent_event_id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn get_active_events_with_message_id(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE deleted_at IS NULL \
           AND message_id IS NOT NULL \
           AND COALESCE(end_time, start_time) >= $1 \
         ORDER BY event_id ASC"
    ))
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn get_active_events_with_threads(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE deleted_at IS NULL \
           AND thread_created = TRUE \
           AND thread_id IS NOT NULL \
           AND COALESCE(end_time, start_time) >= $1 \
         ORDER BY event_id ASC"
    ))
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn get_past_events_with_tentatives(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT DISTINCT {} FROM events e \
         JOIN signups s ON s.event_id = e.event_id \
         WHERE e.deleted_at IS NULL \
           AND e.start_time <= $1 \
           AND s.rsvp_status = 'Tentative' \
         ORDER BY e.event_id ASC",
        qualified_columns("e")
    ))
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Finished events past the cleanup grace period. Recurring origins are
/// excluded: they stay live as the anchor of their chain, and only the child
/// occurrences they spawn get cleaned up.
pub async fn get_finished_events_for_cleanup(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
    grace: Duration,
) -> Result<Vec<DbEvent>> {
    let cutoff = now - grace;

    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE deleted_at IS NULL \
           AND COALESCE(end_time, start_time) <= $1 \
           AND NOT (is_recurring = TRUE AND parent_event_id IS NULL) \
         ORDER BY event_id ASC"
    ))
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn get_events_for_purging(
    pool: &Pool<Postgres>,
    now: DateTime<Utc>,
    retention: Duration,
) -> Result<Vec<DbEvent>> {
    let cutoff = now - retention;

    let events = sqlx::query_as::<_, DbEvent>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE deleted_at IS NOT NULL AND deleted_at <= $1 \
         ORDER BY event_id ASC"
    ))
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

pub async fn create_event(
    pool: &Pool<Postgres>,
    guild_id: i64,
    channel_id: i64,
    creator_id: i64,
    fields: &NewEvent,
) -> Result<i64> {
    tracing::debug!(
        "Creating event: guild_id={}, title={}, start={}",
        guild_id,
        fields.title,
        fields.start_time
    );

    let event_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO events (
            guild_id, channel_id, creator_id, title, description,
            start_time, end_time, timezone, is_recurring, recurrence_rule,
            recreation_hours, parent_event_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING event_id
        "#,
    )
    .bind(guild_id)
    .bind(channel_id)
    .bind(creator_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.start_time)
    .bind(fields.end_time)
    .bind(&fields.timezone)
    .bind(fields.is_recurring)
    .bind(&fields.recurrence_rule)
    .bind(fields.recreation_hours)
    .bind(fields.parent_event_id)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Event created successfully: id={}", event_id);
    Ok(event_id)
}

pub async fn update_event(
    pool: &Pool<Postgres>,
    event_id: i64,
    update: &EventUpdate,
) -> Result<()> {
    tracing::debug!("Updating event: id={}", event_id);

    sqlx::query(
        r#"
        UPDATE events
        SET title = $2, description = $3, start_time = $4, end_time = $5
        WHERE event_id = $1
        "#,
    )
    .bind(event_id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.start_time)
    .bind(update.end_time)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_event_message_id(
    pool: &Pool<Postgres>,
    event_id: i64,
    message_id: i64,
) -> Result<()> {
    sqlx::query("UPDATE events SET message_id = $2 WHERE event_id = $1")
        .bind(event_id)
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn set_event_thread(
    pool: &Pool<Postgres>,
    event_id: i64,
    thread_id: i64,
) -> Result<()> {
    sqlx::query("UPDATE events SET thread_id = $2 WHERE event_id = $1")
        .bind(event_id)
        .bind(thread_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn mark_thread_created(pool: &Pool<Postgres>, event_id: i64) -> Result<()> {
    sqlx::query("UPDATE events SET thread_created = TRUE WHERE event_id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn update_last_recreated_at(
    pool: &Pool<Postgres>,
    event_id: i64,
    at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE events SET last_recreated_at = $2 WHERE event_id = $1")
        .bind(event_id)
        .bind(at)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn mark_event_finished(
    pool: &Pool<Postgres>,
    event_id: i64,
    at: DateTime<Utc>,
) -> Result<()> {
    tracing::debug!("Soft-deleting event: id={}", event_id);

    sqlx::query("UPDATE events SET deleted_at = $2 WHERE event_id = $1 AND deleted_at IS NULL")
        .bind(event_id)
        .bind(at)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_event(pool: &Pool<Postgres>, event_id: i64) -> Result<()> {
    tracing::debug!("Deleting event: id={}", event_id);

    sqlx::query("DELETE FROM events WHERE event_id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(())
}

fn qualified_columns(alias: &str) -> String {
    EVENT_COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
