use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MusterError;

/// Response status for a signup. Stored as text; role and subclass are only
/// meaningful while the status is `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsvpStatus {
    Accepted,
    Tentative,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Accepted => "Accepted",
            RsvpStatus::Tentative => "Tentative",
            RsvpStatus::Declined => "Declined",
        }
    }

    pub fn parse(s: &str) -> Result<Self, MusterError> {
        match s {
            "Accepted" => Ok(RsvpStatus::Accepted),
            "Tentative" => Ok(RsvpStatus::Tentative),
            "Declined" => Ok(RsvpStatus::Declined),
            other => Err(MusterError::InvalidInput(format!(
                "unknown rsvp status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signup {
    pub event_id: i64,
    pub user_id: i64,
    pub rsvp_status: RsvpStatus,
    pub role_name: Option<String>,
    pub subclass_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRsvpRequest {
    pub status: RsvpStatus,
    pub role_name: Option<String>,
    pub subclass_name: Option<String>,
}

/// Primary roles offered on signup. `Infantry` carries a subclass; the
/// remaining roles are drafted from their own specialty pools.
pub const PRIMARY_ROLES: &[&str] = &[
    "Commander",
    "Infantry",
    "Armour",
    "Recon",
    "Artillery",
    "Pathfinder",
];

pub const INFANTRY_SUBCLASSES: &[&str] = &[
    "Officer",
    "Anti-Tank",
    "Assault",
    "Automatic Rifleman",
    "Engineer",
    "Machine Gunner",
    "Medic",
    "Rifleman",
    "Support",
];

pub const ARMOUR_SUBCLASSES: &[&str] = &["Tank Commander", "Crewman"];

pub const RECON_SUBCLASSES: &[&str] = &["Spotter", "Sniper"];

/// Roles that require a configured platform role before a volunteer may
/// sign up for them.
pub const RESTRICTED_ROLES: &[&str] = &["Commander", "Recon", "Officer", "Tank Commander"];

/// Returns the valid subclasses for a primary role, if it has any.
pub fn subclasses_for(role: &str) -> Option<&'static [&'static str]> {
    match role {
        "Infantry" => Some(INFANTRY_SUBCLASSES),
        "Armour" => Some(ARMOUR_SUBCLASSES),
        "Recon" => Some(RECON_SUBCLASSES),
        _ => None,
    }
}
