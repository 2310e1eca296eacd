use std::sync::atomic::{AtomicI64, Ordering};

use muster_core::models::config::GuildConfig;
use muster_core::models::squad::{CapabilityTags, CapacityRequest, Volunteer};
use muster_db::mock::MockStore;
use muster_engine::draft::{run_draft, tags_for_member};
use pretty_assertions::assert_eq;

fn volunteer(user_id: i64, role: Option<&str>, subclass: Option<&str>) -> Volunteer {
    Volunteer {
        user_id,
        display_name: format!("member-{user_id}"),
        role_name: role.map(str::to_string),
        subclass_name: subclass.map(str::to_string),
        tags: CapabilityTags::default(),
    }
}

#[tokio::test]
async fn test_run_draft_clears_then_writes_plan() {
    let volunteers = vec![
        volunteer(1, Some("Commander"), None),
        volunteer(2, Some("Infantry"), Some("Officer")),
        volunteer(3, Some("Infantry"), Some("Rifleman")),
    ];
    let capacity = CapacityRequest {
        infantry_squad_size: 6,
        attack_squads: 1,
        defence_squads: 0,
        flex_squads: 0,
        pathfinder_squads: 0,
        armour_squads: 0,
        recon_squads: 0,
        artillery_squads: 0,
    };

    let next_squad_id = AtomicI64::new(100);

    let mut store = MockStore::new();
    store
        .expect_delete_squads_for_event()
        .withf(|event_id| *event_id == 10)
        .times(1)
        .returning(|_| Ok(()));
    store
        .expect_create_squad()
        .times(2)
        .returning(move |_, _, _| Ok(next_squad_id.fetch_add(1, Ordering::SeqCst)));
    store
        .expect_add_squad_member()
        .times(3)
        .returning(|_, _, _| Ok(()));
    store
        .expect_get_squads_with_members()
        .withf(|event_id| *event_id == 10)
        .times(1)
        .returning(|_| Ok(vec![]));

    run_draft(&store, 10, volunteers, &capacity).await.unwrap();
}

#[tokio::test]
async fn test_run_draft_rejects_bad_capacity_before_clearing() {
    let capacity = CapacityRequest {
        infantry_squad_size: 0,
        attack_squads: 1,
        defence_squads: 0,
        flex_squads: 0,
        pathfinder_squads: 0,
        armour_squads: 0,
        recon_squads: 0,
        artillery_squads: 0,
    };

    let mut store = MockStore::new();
    store.expect_delete_squads_for_event().times(0);

    let result = run_draft(&store, 10, vec![], &capacity).await;
    assert!(result.is_err());
}

#[test]
fn test_tags_for_member_resolves_configured_roles() {
    let mut config = GuildConfig::defaults(1);
    config.attack_role_id = Some(501);
    config.artillery_role_id = Some(502);

    let tags = tags_for_member(&[501, 900], &config);
    assert!(tags.attack);
    assert!(!tags.artillery);
    assert!(!tags.defence);

    let tags = tags_for_member(&[502], &config);
    assert!(tags.artillery);

    // Unconfigured slots never match.
    let none = tags_for_member(&[777], &config);
    assert_eq!(
        (none.attack, none.defence, none.artillery, none.armour, none.pathfinder),
        (false, false, false, false, false)
    );
}
