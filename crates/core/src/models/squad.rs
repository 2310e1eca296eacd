use serde::{Deserialize, Serialize};

use crate::errors::MusterError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    pub squad_id: i64,
    pub event_id: i64,
    pub name: String,
    pub squad_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadMember {
    pub squad_id: i64,
    pub user_id: i64,
    pub assigned_role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadWithMembers {
    pub squad: Squad,
    pub members: Vec<SquadMember>,
}

/// How many squads of each type a draft should produce, plus the seat count
/// for generic infantry-style squads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityRequest {
    pub infantry_squad_size: u32,
    #[serde(default)]
    pub attack_squads: u32,
    #[serde(default)]
    pub defence_squads: u32,
    #[serde(default)]
    pub flex_squads: u32,
    #[serde(default)]
    pub pathfinder_squads: u32,
    #[serde(default)]
    pub armour_squads: u32,
    #[serde(default)]
    pub recon_squads: u32,
    #[serde(default)]
    pub artillery_squads: u32,
}

impl CapacityRequest {
    pub const MAX_SQUADS_PER_TYPE: u32 = 26;
    pub const MAX_SQUAD_SIZE: u32 = 100;

    /// Rejects malformed capacity requests before any squad is touched.
    pub fn validate(&self) -> Result<(), MusterError> {
        if self.infantry_squad_size < 1 || self.infantry_squad_size > Self::MAX_SQUAD_SIZE {
            return Err(MusterError::InvalidInput(format!(
                "infantry squad size must be between 1 and {}",
                Self::MAX_SQUAD_SIZE
            )));
        }
        let counts = [
            ("attack", self.attack_squads),
            ("defence", self.defence_squads),
            ("flex", self.flex_squads),
            ("pathfinder", self.pathfinder_squads),
            ("armour", self.armour_squads),
            ("recon", self.recon_squads),
            ("artillery", self.artillery_squads),
        ];
        for (name, count) in counts {
            if count > Self::MAX_SQUADS_PER_TYPE {
                return Err(MusterError::InvalidInput(format!(
                    "{name} squad count must be at most {}",
                    Self::MAX_SQUADS_PER_TYPE
                )));
            }
        }
        Ok(())
    }
}

/// Capability tags observed on a volunteer's platform membership, resolved
/// against the guild's configured specialty roles.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CapabilityTags {
    pub attack: bool,
    pub defence: bool,
    pub artillery: bool,
    pub armour: bool,
    pub pathfinder: bool,
}

/// One accepted signup as seen by the draft planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub user_id: i64,
    pub display_name: String,
    pub role_name: Option<String>,
    pub subclass_name: Option<String>,
    #[serde(default)]
    pub tags: CapabilityTags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMember {
    pub user_id: i64,
    pub assigned_role_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedSquad {
    pub name: String,
    pub squad_type: String,
    pub members: Vec<PlannedMember>,
}

/// The output of a draft run before persistence: squads in creation order,
/// Reserves (if any) last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPlan {
    pub squads: Vec<PlannedSquad>,
}

impl DraftPlan {
    pub fn member_count(&self) -> usize {
        self.squads.iter().map(|s| s.members.len()).sum()
    }
}
