//! Pure squad-draft planner.
//!
//! Maps an accepted-volunteer pool and a capacity request onto named squads
//! plus a Reserves catch-all. Purely deterministic: volunteers are processed
//! in the order the signup records were retrieved (insertion order), which
//! is the only tie-break. Persistence lives in `muster-engine`; this module
//! never touches the Store.

use std::collections::BTreeMap;

use crate::errors::MusterError;
use crate::models::squad::{
    CapacityRequest, DraftPlan, PlannedMember, PlannedSquad, Volunteer,
};

/// Specialty pools a volunteer can be classified into. Every accepted
/// volunteer lands in exactly one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolName {
    Commander,
    Artillery,
    Recon,
    Armour,
    Pathfinder,
    Attack,
    Defence,
    Flex,
    General,
}

/// Subclass fill order for generic squads. `None` matches volunteers who
/// never picked a subclass.
const SUBCLASS_PRIORITY: &[Option<&str>] = &[
    Some("Officer"),
    Some("Support"),
    Some("Medic"),
    Some("Anti-Tank"),
    Some("Machine Gunner"),
    Some("Automatic Rifleman"),
    Some("Assault"),
    Some("Engineer"),
    Some("Rifleman"),
    None,
];

/// Per-squad seat cap for a subclass within one generic squad. Riflemen and
/// the unassigned are effectively uncapped.
fn class_cap(subclass: Option<&str>) -> usize {
    match subclass {
        Some("Rifleman") | None => usize::MAX,
        Some(_) => 1,
    }
}

/// Generic squad types with the pools eligible to fill them, in lookup
/// order. Flex volunteers backfill plain Attack/Defence squads; every type
/// falls back to the General pool.
const GENERIC_ELIGIBILITY: &[(&str, &[PoolName])] = &[
    ("Attack", &[PoolName::Attack, PoolName::Flex, PoolName::General]),
    ("Defence", &[PoolName::Defence, PoolName::Flex, PoolName::General]),
    (
        "Flex",
        &[PoolName::Flex, PoolName::Attack, PoolName::Defence, PoolName::General],
    ),
    ("Pathfinder", &[PoolName::Pathfinder, PoolName::General]),
];

/// Classifies one volunteer into its specialty pool.
///
/// Explicit top-level roles win; infantry volunteers are routed by the
/// capability tags observed on their platform membership, with the
/// attack+defence combination meaning Flex. Everyone else is General.
pub fn classify(volunteer: &Volunteer) -> PoolName {
    match volunteer.role_name.as_deref() {
        Some("Commander") => return PoolName::Commander,
        Some("Artillery") => return PoolName::Artillery,
        Some("Pathfinder") => return PoolName::Pathfinder,
        Some("Recon") => return PoolName::Recon,
        Some("Armour") => return PoolName::Armour,
        _ => {}
    }

    let tags = &volunteer.tags;
    if tags.artillery && volunteer.subclass_name.as_deref() == Some("Officer") {
        PoolName::Artillery
    } else if tags.attack && tags.defence {
        PoolName::Flex
    } else if tags.attack {
        PoolName::Attack
    } else if tags.defence {
        PoolName::Defence
    } else if tags.pathfinder {
        PoolName::Pathfinder
    } else {
        PoolName::General
    }
}

/// Converts a per-type squad index to its letter: A..Z, then Z1, Z2, ...
fn squad_letter(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("Z{}", index - 25)
    }
}

struct Pools {
    inner: BTreeMap<PoolName, Vec<Volunteer>>,
}

impl Pools {
    fn build(volunteers: Vec<Volunteer>) -> Self {
        let mut inner: BTreeMap<PoolName, Vec<Volunteer>> = BTreeMap::new();
        for volunteer in volunteers {
            let pool = classify(&volunteer);
            inner.entry(pool).or_default().push(volunteer);
        }
        Self { inner }
    }

    /// Pops the earliest-arrived volunteer from `pool`.
    fn take_first(&mut self, pool: PoolName) -> Option<Volunteer> {
        let slot = self.inner.get_mut(&pool)?;
        if slot.is_empty() {
            None
        } else {
            Some(slot.remove(0))
        }
    }

    /// Pops the earliest-arrived volunteer from `pool` whose subclass
    /// matches, preserving the arrival order of everyone else.
    fn take_subclass(&mut self, pool: PoolName, subclass: Option<&str>) -> Option<Volunteer> {
        let slot = self.inner.get_mut(&pool)?;
        let position = slot
            .iter()
            .position(|v| v.subclass_name.as_deref() == subclass)?;
        Some(slot.remove(position))
    }

    /// Searches the eligible pools in order for a subclass match.
    fn take_from_eligible(
        &mut self,
        eligible: &[PoolName],
        subclass: Option<&str>,
    ) -> Option<Volunteer> {
        eligible
            .iter()
            .find_map(|pool| self.take_subclass(*pool, subclass))
    }

    /// Drains every remaining volunteer, pool by pool in arrival order.
    fn drain_remaining(self) -> Vec<Volunteer> {
        self.inner.into_values().flatten().collect()
    }
}

/// Runs the full draft and returns the planned squads (Reserves last, only
/// when non-empty). Rejects a malformed capacity request before doing any
/// work.
pub fn plan_draft(
    volunteers: Vec<Volunteer>,
    request: &CapacityRequest,
) -> Result<DraftPlan, MusterError> {
    request.validate()?;

    let mut pools = Pools::build(volunteers);
    let mut squads: Vec<PlannedSquad> = Vec::new();

    // Command: a single seat, created even when unfilled so the sheet always
    // shows who (if anyone) holds overall command.
    let mut command = PlannedSquad {
        name: "Command".to_string(),
        squad_type: "Command".to_string(),
        members: Vec::new(),
    };
    if let Some(commander) = pools.take_first(PoolName::Commander) {
        command.members.push(PlannedMember {
            user_id: commander.user_id,
            assigned_role_name: "Commander".to_string(),
        });
    }
    squads.push(command);

    // Artillery: one Officer seat per requested squad.
    for i in 0..request.artillery_squads as usize {
        let mut squad = PlannedSquad {
            name: format!("Artillery {}", squad_letter(i)),
            squad_type: "Artillery".to_string(),
            members: Vec::new(),
        };
        if let Some(officer) = pools.take_first(PoolName::Artillery) {
            squad.members.push(PlannedMember {
                user_id: officer.user_id,
                assigned_role_name: "Officer".to_string(),
            });
        }
        squads.push(squad);
    }

    // Recon: exactly one Spotter and one Sniper slot per squad; unmatched
    // slots stay empty rather than erroring.
    for i in 0..request.recon_squads as usize {
        let mut squad = PlannedSquad {
            name: format!("Recon {}", squad_letter(i)),
            squad_type: "Recon".to_string(),
            members: Vec::new(),
        };
        for seat in ["Spotter", "Sniper"] {
            if let Some(v) = pools.take_subclass(PoolName::Recon, Some(seat)) {
                squad.members.push(PlannedMember {
                    user_id: v.user_id,
                    assigned_role_name: seat.to_string(),
                });
            }
        }
        squads.push(squad);
    }

    // Armour: one Tank Commander plus up to two Crewmen.
    for i in 0..request.armour_squads as usize {
        let mut squad = PlannedSquad {
            name: format!("Armour {}", squad_letter(i)),
            squad_type: "Armour".to_string(),
            members: Vec::new(),
        };
        if let Some(v) = pools.take_subclass(PoolName::Armour, Some("Tank Commander")) {
            squad.members.push(PlannedMember {
                user_id: v.user_id,
                assigned_role_name: "Tank Commander".to_string(),
            });
        }
        for _ in 0..2 {
            if let Some(v) = pools.take_subclass(PoolName::Armour, Some("Crewman")) {
                squad.members.push(PlannedMember {
                    user_id: v.user_id,
                    assigned_role_name: "Crewman".to_string(),
                });
            }
        }
        squads.push(squad);
    }

    // Generic squads, filled by subclass priority under the per-squad class
    // caps. A candidate whose class is at cap in the current squad simply
    // stays in its pool for the next squad of that type.
    for &(type_name, eligible) in GENERIC_ELIGIBILITY {
        let count = match type_name {
            "Attack" => request.attack_squads,
            "Defence" => request.defence_squads,
            "Flex" => request.flex_squads,
            "Pathfinder" => request.pathfinder_squads,
            _ => 0,
        };
        for i in 0..count as usize {
            let mut squad = PlannedSquad {
                name: format!("{} {}", type_name, squad_letter(i)),
                squad_type: type_name.to_string(),
                members: Vec::new(),
            };
            fill_generic_squad(
                &mut squad,
                &mut pools,
                eligible,
                request.infantry_squad_size as usize,
            );
            squads.push(squad);
        }
    }

    // Reserves: whoever no pass placed, labelled by their best-known class.
    let leftovers = pools.drain_remaining();
    if !leftovers.is_empty() {
        let members = leftovers
            .into_iter()
            .map(|v| {
                let label = v
                    .subclass_name
                    .or(v.role_name)
                    .unwrap_or_else(|| "Unassigned".to_string());
                PlannedMember {
                    user_id: v.user_id,
                    assigned_role_name: label,
                }
            })
            .collect();
        squads.push(PlannedSquad {
            name: "Reserves".to_string(),
            squad_type: "Reserves".to_string(),
            members,
        });
    }

    Ok(DraftPlan { squads })
}

fn fill_generic_squad(
    squad: &mut PlannedSquad,
    pools: &mut Pools,
    eligible: &[PoolName],
    size: usize,
) {
    for &subclass in SUBCLASS_PRIORITY {
        let cap = class_cap(subclass);
        loop {
            if squad.members.len() >= size {
                return;
            }
            let label = subclass.unwrap_or("Rifleman");
            let seated = squad
                .members
                .iter()
                .filter(|m| m.assigned_role_name == label)
                .count();
            if seated >= cap {
                break;
            }
            match pools.take_from_eligible(eligible, subclass) {
                Some(v) => squad.members.push(PlannedMember {
                    user_id: v.user_id,
                    assigned_role_name: label.to_string(),
                }),
                None => break,
            }
        }
    }
}
