use chrono::{DateTime, Utc};
use eyre::Result;
use muster_core::models::config::{AdminUser, GuildConfig};
use muster_core::models::event::Event;
use muster_core::models::signup::{RsvpStatus, Signup};
use muster_core::models::squad::{Squad, SquadMember};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
    pub event_id: i64,
    pub guild_id: i64,
    pub channel_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub message_id: Option<i64>,
    pub thread_id: Option<i64>,
    pub thread_created: bool,
    pub is_recurring: bool,
    pub recurrence_rule: Option<String>,
    pub recreation_hours: i64,
    pub parent_event_id: Option<i64>,
    pub last_recreated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<DbEvent> for Event {
    fn from(row: DbEvent) -> Self {
        Event {
            event_id: row.event_id,
            guild_id: row.guild_id,
            channel_id: row.channel_id,
            creator_id: row.creator_id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            timezone: row.timezone,
            created_at: row.created_at,
            message_id: row.message_id,
            thread_id: row.thread_id,
            thread_created: row.thread_created,
            is_recurring: row.is_recurring,
            recurrence_rule: row.recurrence_rule,
            recreation_hours: row.recreation_hours,
            parent_event_id: row.parent_event_id,
            last_recreated_at: row.last_recreated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSignup {
    pub signup_id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub rsvp_status: String,
    pub role_name: Option<String>,
    pub subclass_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbSignup {
    /// The status column only ever holds values written via `RsvpStatus`, so
    /// a parse failure here means the row was tampered with.
    pub fn into_signup(self) -> Result<Signup> {
        let status = RsvpStatus::parse(&self.rsvp_status)?;
        Ok(Signup {
            event_id: self.event_id,
            user_id: self.user_id,
            rsvp_status: status,
            role_name: self.role_name,
            subclass_name: self.subclass_name,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSquad {
    pub squad_id: i64,
    pub event_id: i64,
    pub name: String,
    pub squad_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbSquad> for Squad {
    fn from(row: DbSquad) -> Self {
        Squad {
            squad_id: row.squad_id,
            event_id: row.event_id,
            name: row.name,
            squad_type: row.squad_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSquadMember {
    pub member_id: i64,
    pub squad_id: i64,
    pub user_id: i64,
    pub assigned_role_name: String,
}

impl From<DbSquadMember> for SquadMember {
    fn from(row: DbSquadMember) -> Self {
        SquadMember {
            squad_id: row.squad_id,
            user_id: row.user_id,
            assigned_role_name: row.assigned_role_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGuildConfig {
    pub guild_id: i64,
    pub thread_hours: i64,
    pub attack_role_id: Option<i64>,
    pub defence_role_id: Option<i64>,
    pub artillery_role_id: Option<i64>,
    pub armour_role_id: Option<i64>,
    pub pathfinder_role_id: Option<i64>,
    pub manager_role_id: Option<i64>,
}

impl From<DbGuildConfig> for GuildConfig {
    fn from(row: DbGuildConfig) -> Self {
        GuildConfig {
            guild_id: row.guild_id,
            thread_hours: row.thread_hours,
            attack_role_id: row.attack_role_id,
            defence_role_id: row.defence_role_id,
            artillery_role_id: row.artillery_role_id,
            armour_role_id: row.armour_role_id,
            pathfinder_role_id: row.pathfinder_role_id,
            manager_role_id: row.manager_role_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for AdminUser {
    fn from(row: DbUser) -> Self {
        AdminUser {
            id: row.id,
            username: row.username,
            is_active: row.is_active,
            is_admin: row.is_admin,
        }
    }
}
