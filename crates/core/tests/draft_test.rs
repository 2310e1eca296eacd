use muster_core::draft::{classify, plan_draft, PoolName};
use muster_core::errors::MusterError;
use muster_core::models::squad::{CapacityRequest, CapabilityTags, Volunteer};
use pretty_assertions::assert_eq;

fn volunteer(user_id: i64, role: Option<&str>, subclass: Option<&str>) -> Volunteer {
    Volunteer {
        user_id,
        display_name: format!("user-{user_id}"),
        role_name: role.map(str::to_string),
        subclass_name: subclass.map(str::to_string),
        tags: CapabilityTags::default(),
    }
}

fn tagged(mut v: Volunteer, f: impl FnOnce(&mut CapabilityTags)) -> Volunteer {
    f(&mut v.tags);
    v
}

fn request(size: u32) -> CapacityRequest {
    CapacityRequest {
        infantry_squad_size: size,
        attack_squads: 0,
        defence_squads: 0,
        flex_squads: 0,
        pathfinder_squads: 0,
        armour_squads: 0,
        recon_squads: 0,
        artillery_squads: 0,
    }
}

#[test]
fn test_classification_precedence() {
    // Explicit top-level role wins over any tags.
    let armour = tagged(volunteer(1, Some("Armour"), Some("Crewman")), |t| {
        t.attack = true
    });
    assert_eq!(classify(&armour), PoolName::Armour);

    // Both attack and defence tags mean Flex.
    let flex = tagged(volunteer(2, Some("Infantry"), Some("Rifleman")), |t| {
        t.attack = true;
        t.defence = true;
    });
    assert_eq!(classify(&flex), PoolName::Flex);

    let attack = tagged(volunteer(3, Some("Infantry"), None), |t| t.attack = true);
    assert_eq!(classify(&attack), PoolName::Attack);

    // Artillery certification only routes Officers.
    let arty = tagged(volunteer(4, Some("Infantry"), Some("Officer")), |t| {
        t.artillery = true
    });
    assert_eq!(classify(&arty), PoolName::Artillery);
    let not_arty = tagged(volunteer(5, Some("Infantry"), Some("Medic")), |t| {
        t.artillery = true
    });
    assert_eq!(classify(&not_arty), PoolName::General);

    assert_eq!(
        classify(&volunteer(6, Some("Infantry"), Some("Rifleman"))),
        PoolName::General
    );
}

#[test]
fn test_seven_infantry_overflow_to_reserves() {
    // 1 Officer + 6 Riflemen, one Attack squad of 6: Officer + 5 Riflemen
    // seated, 1 Rifleman falls to Reserves.
    let mut pool = vec![volunteer(1, Some("Infantry"), Some("Officer"))];
    for id in 2..=7 {
        pool.push(volunteer(id, Some("Infantry"), Some("Rifleman")));
    }

    let mut req = request(6);
    req.attack_squads = 1;

    let plan = plan_draft(pool, &req).expect("draft should succeed");

    let attack = plan
        .squads
        .iter()
        .find(|s| s.name == "Attack A")
        .expect("attack squad exists");
    assert_eq!(attack.members.len(), 6);
    assert_eq!(attack.members[0].assigned_role_name, "Officer");
    assert_eq!(
        attack
            .members
            .iter()
            .filter(|m| m.assigned_role_name == "Rifleman")
            .count(),
        5
    );

    let reserves = plan
        .squads
        .iter()
        .find(|s| s.name == "Reserves")
        .expect("reserves exist");
    assert_eq!(reserves.members.len(), 1);
    assert_eq!(reserves.members[0].assigned_role_name, "Rifleman");
}

#[test]
fn test_draft_conservation() {
    // Every accepted volunteer lands in exactly one squad, none duplicated.
    let mut pool = vec![
        volunteer(1, Some("Commander"), None),
        volunteer(2, Some("Recon"), Some("Spotter")),
        volunteer(3, Some("Recon"), Some("Sniper")),
        volunteer(4, Some("Armour"), Some("Tank Commander")),
        volunteer(5, Some("Armour"), Some("Crewman")),
        volunteer(6, Some("Armour"), Some("Crewman")),
        volunteer(7, Some("Artillery"), None),
    ];
    for id in 8..=20 {
        pool.push(volunteer(id, Some("Infantry"), Some("Rifleman")));
    }
    let total = pool.len();

    let mut req = request(6);
    req.attack_squads = 1;
    req.recon_squads = 1;
    req.armour_squads = 1;
    req.artillery_squads = 1;

    let plan = plan_draft(pool, &req).expect("draft should succeed");

    assert_eq!(plan.member_count(), total);
    let mut seen = std::collections::HashSet::new();
    for squad in &plan.squads {
        for member in &squad.members {
            assert!(seen.insert(member.user_id), "user {} drafted twice", member.user_id);
        }
    }
}

#[test]
fn test_class_cap_defers_to_next_squad() {
    // Two Officers, two Attack squads: one Officer each, never two in one.
    let pool = vec![
        volunteer(1, Some("Infantry"), Some("Officer")),
        volunteer(2, Some("Infantry"), Some("Officer")),
        volunteer(3, Some("Infantry"), Some("Rifleman")),
        volunteer(4, Some("Infantry"), Some("Rifleman")),
    ];
    let mut req = request(2);
    req.attack_squads = 2;

    let plan = plan_draft(pool, &req).expect("draft should succeed");

    for name in ["Attack A", "Attack B"] {
        let squad = plan.squads.iter().find(|s| s.name == name).expect("squad");
        assert_eq!(
            squad
                .members
                .iter()
                .filter(|m| m.assigned_role_name == "Officer")
                .count(),
            1,
            "{name} must hold exactly one Officer"
        );
    }
}

#[test]
fn test_recon_and_armour_capacity_slots() {
    let pool = vec![
        volunteer(1, Some("Recon"), Some("Spotter")),
        volunteer(2, Some("Recon"), Some("Spotter")),
        volunteer(3, Some("Recon"), Some("Sniper")),
        volunteer(4, Some("Armour"), Some("Tank Commander")),
        volunteer(5, Some("Armour"), Some("Crewman")),
        volunteer(6, Some("Armour"), Some("Crewman")),
        volunteer(7, Some("Armour"), Some("Crewman")),
    ];
    let mut req = request(6);
    req.recon_squads = 1;
    req.armour_squads = 1;

    let plan = plan_draft(pool, &req).expect("draft should succeed");

    let recon = plan.squads.iter().find(|s| s.name == "Recon A").unwrap();
    assert_eq!(recon.members.len(), 2); // one Spotter, one Sniper
    let armour = plan.squads.iter().find(|s| s.name == "Armour A").unwrap();
    assert_eq!(armour.members.len(), 3); // TC + two Crewmen

    // The spare Spotter and spare Crewman end up in Reserves.
    let reserves = plan.squads.iter().find(|s| s.name == "Reserves").unwrap();
    assert_eq!(reserves.members.len(), 2);
}

#[test]
fn test_flex_backfills_attack_and_defence() {
    let pool = vec![
        tagged(volunteer(1, Some("Infantry"), Some("Rifleman")), |t| {
            t.attack = true;
            t.defence = true;
        }),
        tagged(volunteer(2, Some("Infantry"), Some("Rifleman")), |t| {
            t.attack = true;
            t.defence = true;
        }),
    ];
    let mut req = request(2);
    req.attack_squads = 1;

    let plan = plan_draft(pool, &req).expect("draft should succeed");
    let attack = plan.squads.iter().find(|s| s.name == "Attack A").unwrap();
    assert_eq!(attack.members.len(), 2);
    assert!(plan.squads.iter().all(|s| s.name != "Reserves"));
}

#[test]
fn test_empty_seats_are_not_an_error() {
    // Requested squads with no matching volunteers stay empty.
    let mut req = request(6);
    req.recon_squads = 2;
    req.artillery_squads = 1;

    let plan = plan_draft(Vec::new(), &req).expect("draft should succeed");
    assert_eq!(plan.member_count(), 0);
    // Command + 1 artillery + 2 recon squads were still created.
    assert_eq!(plan.squads.len(), 4);
}

#[test]
fn test_invalid_capacity_rejected_before_planning() {
    let mut req = request(0);
    req.attack_squads = 1;
    let err = plan_draft(vec![volunteer(1, None, None)], &req).unwrap_err();
    assert!(matches!(err, MusterError::InvalidInput(_)));

    let mut req = request(6);
    req.defence_squads = 40;
    let err = plan_draft(Vec::new(), &req).unwrap_err();
    assert!(matches!(err, MusterError::InvalidInput(_)));
}

#[test]
fn test_squad_letters_per_type() {
    let mut req = request(1);
    req.attack_squads = 3;
    req.defence_squads = 2;

    let plan = plan_draft(Vec::new(), &req).expect("draft should succeed");
    let names: Vec<&str> = plan.squads.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"Attack A"));
    assert!(names.contains(&"Attack B"));
    assert!(names.contains(&"Attack C"));
    assert!(names.contains(&"Defence A"));
    assert!(names.contains(&"Defence B"));
}
