//! Assembly integration tests
//!
//! Verify slot declaration, part filling, refilling, derived health, and
//! the cosmetic brightness pass end-to-end against the kinematic host.

use glam::Vec2;

use wreckage::assembly::{
    create_slot_entities, fill_slot, spawn_vehicle, vehicle_health, AssemblyWorld, FillOptions,
    SlotParent, SlotSpec, SpawnOptions, VehicleLayout,
};
use wreckage::core::config::EngineConfig;
use wreckage::core::types::{smoothstep, EngineClass, PartKind, Team, VehicleClass, VehicleId};
use wreckage::damage::tear_off;
use wreckage::physics::kinematic::KinematicHost;
use wreckage::physics::PhysicsHost;

/// Bare chassis with four hull plates, no turret or tracks
fn four_plate_layout() -> VehicleLayout {
    let slots = vec![
        SlotSpec { x: -1.5, y: 1.0, w: 1.2, h: 0.4, kind: PartKind::HullPlate },
        SlotSpec { x: -0.5, y: 1.0, w: 1.2, h: 0.4, kind: PartKind::HullPlate },
        SlotSpec { x: 0.5, y: 1.0, w: 1.2, h: 0.4, kind: PartKind::HullPlate },
        SlotSpec { x: 1.5, y: 1.0, w: 1.2, h: 0.4, kind: PartKind::HullPlate },
    ];
    VehicleLayout {
        chassis_half_extents: [2.0, 1.2],
        chassis_density: 6.0,
        chassis_slots: slots,
        turret: None,
        tracks: Vec::new(),
        wheels: Vec::new(),
    }
}

fn spawn_four_plate(
    world: &mut AssemblyWorld,
    host: &mut KinematicHost,
    cfg: &EngineConfig,
) -> VehicleId {
    spawn_vehicle(
        world,
        host,
        cfg,
        &SpawnOptions {
            class: VehicleClass::LightTank,
            engine: EngineClass::Piston,
            team: Team::Red,
            position: Vec2::ZERO,
            rotation: 0.0,
            layout: Some(four_plate_layout()),
        },
    )
}

#[test]
fn test_fill_slot_is_exactly_once() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    let slot = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .next()
        .unwrap();
    assert!(world.slots.is_filled(slot));

    let bodies_before = host.body_count();
    let joints_before = host.joint_count();

    // Second fill on an occupied slot: no-op, no duplicate body or joint
    let opts = FillOptions {
        team: Some(Team::Red),
        owner: Some(vehicle),
        toughness: None,
    };
    assert!(fill_slot(&mut world, &mut host, &cfg, slot, &opts).is_none());
    assert_eq!(host.body_count(), bodies_before);
    assert_eq!(host.joint_count(), joints_before);
}

#[test]
fn test_create_slot_entities_is_geometry_only() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    let bodies_before = host.body_count();
    let created = create_slot_entities(
        &mut world,
        SlotParent::Chassis(vehicle),
        &[SlotSpec {
            x: 0.0,
            y: -1.0,
            w: 1.0,
            h: 0.4,
            kind: PartKind::HullPlate,
        }],
    );

    // Declared but empty: no physics yet
    assert_eq!(created.len(), 1);
    assert!(!world.slots.is_filled(created[0]));
    assert_eq!(host.body_count(), bodies_before);
}

#[test]
fn test_slot_refill_after_tear_off() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    let slot = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .next()
        .unwrap();
    let old_filler = world.slots.fillers[slot.0 as usize].unwrap();

    assert!(tear_off(&mut world, &mut host, old_filler));
    assert!(!world.slots.is_filled(slot));
    assert_eq!(world.attached_part_count(vehicle), 3);

    // The same declared geometry takes a fresh filler
    let opts = FillOptions {
        team: Some(Team::Red),
        owner: Some(vehicle),
        toughness: None,
    };
    let new_filler = fill_slot(&mut world, &mut host, &cfg, slot, &opts).unwrap();
    assert_ne!(new_filler, old_filler);
    assert!(world.slots.is_filled(slot));
    assert_eq!(world.attached_part_count(vehicle), 4);

    // The torn filler stays detached; invariants hold per part
    assert!(!world.fillers.joints[old_filler.0 as usize].is_attached());
    assert!(world.fillers.joints[new_filler.0 as usize].is_attached());
}

#[test]
fn test_health_monotone_and_reaches_zero() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    assert_eq!(world.vehicles.initial_parts[vehicle.0 as usize], 4);
    let mut last_health = vehicle_health(&world, vehicle, &cfg);
    assert!((last_health - 1.0).abs() < 1e-6);

    let slots: Vec<_> = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .collect();
    for slot in slots {
        let filler = world.slots.fillers[slot.0 as usize].unwrap();
        tear_off(&mut world, &mut host, filler);
        let health = vehicle_health(&world, vehicle, &cfg);
        assert!(health <= last_health);
        last_health = health;
    }

    assert_eq!(world.attached_part_count(vehicle), 0);
    assert_eq!(last_health, 0.0);
}

#[test]
fn test_health_matches_smoothstep_curve() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    // Tear two of four off: health sits exactly on the curve at 0.5
    let slots: Vec<_> = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .take(2)
        .collect();
    for slot in slots {
        let filler = world.slots.fillers[slot.0 as usize].unwrap();
        tear_off(&mut world, &mut host, filler);
    }

    let expected = smoothstep(cfg.health_smooth_threshold, 1.0, 0.5);
    assert!((vehicle_health(&world, vehicle, &cfg) - expected).abs() < 1e-6);
}

#[test]
fn test_brightness_offsets_by_child_index() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_four_plate(&mut world, &mut host, &cfg);

    let fillers: Vec<_> = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .map(|s| world.slots.fillers[s.0 as usize].unwrap())
        .collect();

    let first = world.fillers.colors[fillers[0].0 as usize];
    let second = world.fillers.colors[fillers[1].0 as usize];
    assert_ne!(first, second);
    // Alpha stays untouched, the offset is brightness only
    assert_eq!(first[3], second[3]);
    // Re-running the pass converges instead of drifting
    wreckage::assembly::update_slot_brightness(&mut world, SlotParent::Chassis(vehicle), &cfg);
    assert_eq!(world.fillers.colors[fillers[1].0 as usize], second);
}

#[test]
fn test_standard_tank_spawn_counts() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let vehicle = spawn_vehicle(
        &mut world,
        &mut host,
        &cfg,
        &SpawnOptions {
            class: VehicleClass::MediumTank,
            engine: EngineClass::Turbine,
            team: Team::Blue,
            position: Vec2::new(30.0, -10.0),
            rotation: 0.5,
            layout: None,
        },
    );

    let layout = VehicleLayout::for_class(VehicleClass::MediumTank);
    let expected_initial =
        layout.chassis_slots.len() + layout.turret.as_ref().unwrap().slots.len();
    assert_eq!(
        world.vehicles.initial_parts[vehicle.0 as usize] as usize,
        expected_initial
    );
    // Track links fill but do not count toward the health baseline
    let total_fillers = world.fillers.count();
    let track_links: usize = layout.tracks.iter().map(|t| t.slots.len()).sum();
    assert_eq!(total_fillers, expected_initial + track_links);
    assert!(world.vehicles.turrets[vehicle.0 as usize].is_some());
}

#[test]
fn test_toml_layout_spawns() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();

    let layout = VehicleLayout::from_toml_str(
        r#"
chassis_half_extents = [2.5, 1.5]
chassis_density = 5.0

[[chassis_slots]]
x = 0.0
y = 1.5
w = 1.4
h = 0.4
kind = "HullPlate"

[[chassis_slots]]
x = 0.0
y = -1.5
w = 1.4
h = 0.4
kind = "HullPlate"
"#,
    )
    .unwrap();
    layout.validate(&cfg).unwrap();

    let vehicle = spawn_vehicle(
        &mut world,
        &mut host,
        &cfg,
        &SpawnOptions {
            class: VehicleClass::Harvester,
            engine: EngineClass::Electric,
            team: Team::Red,
            position: Vec2::ZERO,
            rotation: 0.0,
            layout: Some(layout),
        },
    );
    assert_eq!(world.vehicles.initial_parts[vehicle.0 as usize], 2);
}

#[test]
fn test_filled_parts_spawn_at_rotated_anchor() {
    let cfg = EngineConfig::default();
    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();

    let layout = VehicleLayout {
        chassis_half_extents: [2.0, 1.0],
        chassis_density: 6.0,
        chassis_slots: vec![SlotSpec {
            x: 2.0,
            y: 0.0,
            w: 1.0,
            h: 0.4,
            kind: PartKind::HullPlate,
        }],
        turret: None,
        tracks: Vec::new(),
        wheels: Vec::new(),
    };
    let vehicle = spawn_vehicle(
        &mut world,
        &mut host,
        &cfg,
        &SpawnOptions {
            class: VehicleClass::LightTank,
            engine: EngineClass::Piston,
            team: Team::Red,
            position: Vec2::new(10.0, 5.0),
            rotation: std::f32::consts::FRAC_PI_2,
            layout: Some(layout),
        },
    );

    let slot = world.vehicles.slot_children[vehicle.0 as usize]
        .iter()
        .next()
        .unwrap();
    let filler = world.slots.fillers[slot.0 as usize].unwrap();
    let state = host
        .body_state(world.fillers.bodies[filler.0 as usize])
        .unwrap();
    // Anchor (2, 0) rotated a quarter turn lands at (0, 2) off the chassis
    assert!((state.translation.x - 10.0).abs() < 1e-5);
    assert!((state.translation.y - 7.0).abs() < 1e-5);
}
