use serde::{Deserialize, Serialize};

/// Per-guild settings mutated only by administrative setup commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: i64,
    /// Hours before an event's start at which its discussion thread opens.
    pub thread_hours: i64,
    pub attack_role_id: Option<i64>,
    pub defence_role_id: Option<i64>,
    pub artillery_role_id: Option<i64>,
    pub armour_role_id: Option<i64>,
    pub pathfinder_role_id: Option<i64>,
    /// Role allowed to edit and delete other members' events.
    pub manager_role_id: Option<i64>,
}

impl GuildConfig {
    pub const DEFAULT_THREAD_HOURS: i64 = 24;

    pub fn defaults(guild_id: i64) -> Self {
        Self {
            guild_id,
            thread_hours: Self::DEFAULT_THREAD_HOURS,
            attack_role_id: None,
            defence_role_id: None,
            artillery_role_id: None,
            armour_role_id: None,
            pathfinder_role_id: None,
            manager_role_id: None,
        }
    }
}

/// The configurable specialty-role slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityRole {
    Attack,
    Defence,
    Artillery,
    Armour,
    Pathfinder,
}

impl CapabilityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityRole::Attack => "attack",
            CapabilityRole::Defence => "defence",
            CapabilityRole::Artillery => "artillery",
            CapabilityRole::Armour => "armour",
            CapabilityRole::Pathfinder => "pathfinder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attack" => Some(CapabilityRole::Attack),
            "defence" => Some(CapabilityRole::Defence),
            "artillery" => Some(CapabilityRole::Artillery),
            "armour" => Some(CapabilityRole::Armour),
            "pathfinder" => Some(CapabilityRole::Pathfinder),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}
