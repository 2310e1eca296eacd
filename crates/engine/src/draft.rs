use muster_core::draft::plan_draft;
use muster_core::errors::MusterError;
use muster_core::models::config::GuildConfig;
use muster_core::models::squad::{CapabilityTags, CapacityRequest, SquadWithMembers, Volunteer};
use muster_core::store::Store;
use tracing::info;

/// Resolves a member's observed platform role ids against the guild's
/// configured capability roles.
pub fn tags_for_member(role_ids: &[i64], config: &GuildConfig) -> CapabilityTags {
    let has = |configured: Option<i64>| configured.is_some_and(|id| role_ids.contains(&id));

    CapabilityTags {
        attack: has(config.attack_role_id),
        defence: has(config.defence_role_id),
        artillery: has(config.artillery_role_id),
        armour: has(config.armour_role_id),
        pathfinder: has(config.pathfinder_role_id),
    }
}

/// Plans and persists a squad draft for an event.
///
/// Destructive and idempotent: prior squads are cleared first and the plan
/// is written in arrival order. There is no rollback on partial failure; the
/// recovery path is re-invocation, which clears again.
pub async fn run_draft(
    store: &dyn Store,
    event_id: i64,
    volunteers: Vec<Volunteer>,
    capacity: &CapacityRequest,
) -> Result<Vec<SquadWithMembers>, MusterError> {
    let plan = plan_draft(volunteers, capacity)?;

    info!(
        "Drafting event {}: {} squads, {} members",
        event_id,
        plan.squads.len(),
        plan.member_count()
    );

    store
        .delete_squads_for_event(event_id)
        .await
        .map_err(MusterError::Database)?;

    for squad in &plan.squads {
        let squad_id = store
            .create_squad(event_id, &squad.name, &squad.squad_type)
            .await
            .map_err(MusterError::Database)?;

        for member in &squad.members {
            store
                .add_squad_member(squad_id, member.user_id, &member.assigned_role_name)
                .await
                .map_err(MusterError::Database)?;
        }
    }

    store
        .get_squads_with_members(event_id)
        .await
        .map_err(MusterError::Database)
}
