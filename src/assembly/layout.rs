//! Declarative vehicle layouts and full-assembly spawning
//!
//! A layout lists slot geometry per parent body plus the sub-assembly
//! bodies themselves. Layouts are plain data: built-in tables per vehicle
//! class, or parsed from TOML for bespoke vehicles. Spawning walks the
//! layout, creates every body and joint, declares every slot, and fills
//! them all.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assembly::filler::{fill_slot, update_slot_brightness, FillOptions};
use crate::assembly::slots::{create_slot_entities, SlotSpec};
use crate::assembly::world::{AssemblyWorld, BodyOwner, SlotParent};
use crate::core::config::EngineConfig;
use crate::core::error::{AssemblyError, Result};
use crate::core::types::{EngineClass, PartKind, SlotId, Team, TrackSide, VehicleClass, VehicleId};
use crate::physics::binding::JointBinding;
use crate::physics::host::{rotate, BodyDef, InteractionGroups, JointKind, PhysicsHost};
use crate::registry::groups;

const TURRET_DENSITY: f32 = 6.0;
const TRACK_DENSITY: f32 = 3.0;
const WHEEL_DENSITY: f32 = 2.0;

/// Turret body plus its slot ring and firing mechanism
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretLayout {
    pub anchor: [f32; 2],
    pub half_extents: [f32; 2],
    pub gun_caliber: f32,
    pub muzzle: [f32; 2],
    pub slots: Vec<SlotSpec>,
}

/// Track body, its side, nominal belt length, and link slots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackLayout {
    pub side: TrackSide,
    pub anchor: [f32; 2],
    pub half_extents: [f32; 2],
    pub length: f32,
    pub slots: Vec<SlotSpec>,
}

/// A single wheel body and its capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WheelLayout {
    pub anchor: [f32; 2],
    pub half_extents: [f32; 2],
    pub steerable: bool,
    pub driven: bool,
}

/// Complete declarative description of one vehicle's composite body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLayout {
    pub chassis_half_extents: [f32; 2],
    pub chassis_density: f32,
    #[serde(default)]
    pub chassis_slots: Vec<SlotSpec>,
    #[serde(default)]
    pub turret: Option<TurretLayout>,
    #[serde(default)]
    pub tracks: Vec<TrackLayout>,
    #[serde(default)]
    pub wheels: Vec<WheelLayout>,
}

impl VehicleLayout {
    /// Parse a layout from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let layout: VehicleLayout = toml::from_str(text)?;
        Ok(layout)
    }

    /// Check a layout against the configured child-list capacity
    ///
    /// Built-in layouts are known-good; this is for TOML-loaded ones,
    /// where overflow should be a parse-time error instead of a panic
    /// at spawn.
    pub fn validate(&self, cfg: &EngineConfig) -> Result<()> {
        let cap = cfg.max_children_per_parent;
        if self.chassis_slots.len() > cap {
            return Err(AssemblyError::InvalidLayout(format!(
                "chassis declares {} slots, capacity is {}",
                self.chassis_slots.len(),
                cap
            )));
        }
        if let Some(turret) = &self.turret {
            if turret.slots.len() > cap {
                return Err(AssemblyError::InvalidLayout(format!(
                    "turret declares {} slots, capacity is {}",
                    turret.slots.len(),
                    cap
                )));
            }
        }
        for track in &self.tracks {
            if track.slots.len() > cap {
                return Err(AssemblyError::InvalidLayout(format!(
                    "track declares {} slots, capacity is {}",
                    track.slots.len(),
                    cap
                )));
            }
            if track.length <= 0.0 {
                return Err(AssemblyError::InvalidLayout(
                    "track length must be positive".into(),
                ));
            }
        }
        Ok(())
    }

    /// The standard layout for a vehicle class
    pub fn for_class(class: VehicleClass) -> Self {
        match class {
            VehicleClass::LightTank => tank_layout(2.4, 1.6, 3, 1.1, 8, 14.0),
            VehicleClass::MediumTank => tank_layout(3.0, 2.0, 4, 1.4, 10, 18.0),
            VehicleClass::HeavyTank => tank_layout(3.8, 2.6, 5, 1.8, 12, 22.0),
            VehicleClass::PlayerTank => {
                let mut layout = tank_layout(3.0, 2.0, 4, 1.4, 10, 18.0);
                // Player hulls carry a regenerating shield ring on top
                for spec in shield_ring(3.0, 2.0) {
                    layout.chassis_slots.push(spec);
                }
                layout
            }
            VehicleClass::Harvester => wheeled_layout(4.0, 2.6, 4, 6),
            VehicleClass::MeleeCar => wheeled_layout(2.2, 1.2, 3, 4),
        }
    }
}

/// Hull plates along both long edges of the chassis
fn hull_plates(half_w: f32, half_h: f32, per_side: usize) -> Vec<SlotSpec> {
    let mut slots = Vec::new();
    let plate_w = (2.0 * half_w) / per_side as f32;
    for i in 0..per_side {
        let x = -half_w + plate_w * (i as f32 + 0.5);
        for y in [half_h, -half_h] {
            slots.push(SlotSpec {
                x,
                y,
                w: plate_w * 0.9,
                h: 0.4,
                kind: PartKind::HullPlate,
            });
        }
    }
    slots
}

/// Four shield plates floating just off the chassis corners
fn shield_ring(half_w: f32, half_h: f32) -> Vec<SlotSpec> {
    let mut slots = Vec::new();
    for x in [-half_w, half_w] {
        for y in [-half_h - 0.6, half_h + 0.6] {
            slots.push(SlotSpec {
                x,
                y,
                w: 1.2,
                h: 0.3,
                kind: PartKind::ShieldPlate,
            });
        }
    }
    slots
}

/// Evenly spaced track links along a belt of the given length
fn track_links(length: f32, count: usize) -> Vec<SlotSpec> {
    let mut slots = Vec::new();
    let pitch = length / count as f32;
    for i in 0..count {
        slots.push(SlotSpec {
            x: -length * 0.5 + pitch * (i as f32 + 0.5),
            y: 0.0,
            w: pitch * 0.85,
            h: 0.5,
            kind: PartKind::TrackLink,
        });
    }
    slots
}

/// Tracked chassis with a turret: the tank family
fn tank_layout(
    half_w: f32,
    half_h: f32,
    hull_per_side: usize,
    turret_radius: f32,
    links_per_track: usize,
    track_length: f32,
) -> VehicleLayout {
    let turret_slots = vec![
        SlotSpec {
            x: turret_radius,
            y: 0.0,
            w: 0.8,
            h: 0.8,
            kind: PartKind::TurretPlate,
        },
        SlotSpec {
            x: -turret_radius,
            y: 0.0,
            w: 0.8,
            h: 0.8,
            kind: PartKind::TurretPlate,
        },
        SlotSpec {
            x: 0.0,
            y: turret_radius,
            w: 0.8,
            h: 0.8,
            kind: PartKind::TurretPlate,
        },
        SlotSpec {
            x: 0.0,
            y: -turret_radius,
            w: 0.8,
            h: 0.8,
            kind: PartKind::TurretPlate,
        },
    ];

    let track_offset = half_h + 0.7;
    VehicleLayout {
        chassis_half_extents: [half_w, half_h],
        chassis_density: 8.0,
        chassis_slots: hull_plates(half_w, half_h, hull_per_side),
        turret: Some(TurretLayout {
            anchor: [0.0, 0.0],
            half_extents: [turret_radius, turret_radius],
            gun_caliber: 8.0,
            muzzle: [turret_radius + 1.0, 0.0],
            slots: turret_slots,
        }),
        tracks: vec![
            TrackLayout {
                side: TrackSide::Left,
                anchor: [0.0, track_offset],
                half_extents: [track_length * 0.5, 0.5],
                length: track_length,
                slots: track_links(track_length, links_per_track),
            },
            TrackLayout {
                side: TrackSide::Right,
                anchor: [0.0, -track_offset],
                half_extents: [track_length * 0.5, 0.5],
                length: track_length,
                slots: track_links(track_length, links_per_track),
            },
        ],
        wheels: Vec::new(),
    }
}

/// Wheeled chassis without a turret: harvester and ramming car
fn wheeled_layout(
    half_w: f32,
    half_h: f32,
    hull_per_side: usize,
    wheel_count: usize,
) -> VehicleLayout {
    let mut wheels = Vec::new();
    let per_side = wheel_count / 2;
    let pitch = (2.0 * half_w) / per_side as f32;
    for i in 0..per_side {
        let x = -half_w + pitch * (i as f32 + 0.5);
        // Frontmost axle steers
        let steerable = i == per_side - 1;
        for y in [half_h + 0.5, -half_h - 0.5] {
            wheels.push(WheelLayout {
                anchor: [x, y],
                half_extents: [0.6, 0.35],
                steerable,
                driven: true,
            });
        }
    }

    VehicleLayout {
        chassis_half_extents: [half_w, half_h],
        chassis_density: 6.0,
        chassis_slots: hull_plates(half_w, half_h, hull_per_side),
        turret: None,
        tracks: Vec::new(),
        wheels,
    }
}

/// Everything needed to place a vehicle into the world
#[derive(Debug, Clone)]
pub struct SpawnOptions {
    pub class: VehicleClass,
    pub engine: EngineClass,
    pub team: Team,
    pub position: Vec2,
    pub rotation: f32,
    /// Override the class's standard layout
    pub layout: Option<VehicleLayout>,
}

/// Create a complete vehicle: chassis, sub-assemblies, slots, and fillers
///
/// Records the filled chassis+turret part count as the health baseline.
pub fn spawn_vehicle(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    cfg: &EngineConfig,
    opts: &SpawnOptions,
) -> VehicleId {
    let layout = opts
        .layout
        .clone()
        .unwrap_or_else(|| VehicleLayout::for_class(opts.class));

    let chassis_body = physics.create_body(&BodyDef {
        position: opts.position,
        rotation: opts.rotation,
        half_extents: Vec2::from(layout.chassis_half_extents),
        density: layout.chassis_density,
        linvel: Vec2::ZERO,
        collision_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
        solver_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
    });

    let vehicle = world.vehicles.spawn(
        opts.class,
        opts.engine,
        opts.team,
        chassis_body,
        cfg.max_children_per_parent,
    );
    world
        .body_owners
        .insert(chassis_body, BodyOwner::Chassis(vehicle));

    create_slot_entities(world, SlotParent::Chassis(vehicle), &layout.chassis_slots);

    if let Some(turret_layout) = &layout.turret {
        let anchor = Vec2::from(turret_layout.anchor);
        let body = physics.create_body(&BodyDef {
            position: opts.position + rotate(anchor, opts.rotation),
            rotation: opts.rotation,
            half_extents: Vec2::from(turret_layout.half_extents),
            density: TURRET_DENSITY,
            linvel: Vec2::ZERO,
            collision_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
            solver_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
        });
        let joint = physics.create_joint(JointKind::Revolute, chassis_body, body, anchor, Vec2::ZERO);
        let turret = world.turrets.spawn(
            vehicle,
            body,
            JointBinding::Attached(joint),
            cfg.max_children_per_parent,
        );
        world.vehicles.turrets[vehicle.0 as usize] = Some(turret);
        world.body_owners.insert(body, BodyOwner::Turret(turret));

        let gun = world.guns.spawn(
            turret,
            turret_layout.gun_caliber,
            Vec2::from(turret_layout.muzzle),
        );
        world.turrets.guns[turret.0 as usize] = Some(gun);

        create_slot_entities(world, SlotParent::Turret(turret), &turret_layout.slots);
    }

    for track_layout in &layout.tracks {
        let anchor = Vec2::from(track_layout.anchor);
        let body = physics.create_body(&BodyDef {
            position: opts.position + rotate(anchor, opts.rotation),
            rotation: opts.rotation,
            half_extents: Vec2::from(track_layout.half_extents),
            density: TRACK_DENSITY,
            linvel: Vec2::ZERO,
            collision_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
            solver_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
        });
        let joint = physics.create_joint(JointKind::Fixed, chassis_body, body, anchor, Vec2::ZERO);
        let track = world.tracks.spawn(
            vehicle,
            body,
            JointBinding::Attached(joint),
            track_layout.side,
            track_layout.length,
            cfg.max_children_per_parent,
        );
        world.body_owners.insert(body, BodyOwner::Track(track));

        create_slot_entities(world, SlotParent::Track(track), &track_layout.slots);
    }

    for wheel_layout in &layout.wheels {
        let anchor = Vec2::from(wheel_layout.anchor);
        let body = physics.create_body(&BodyDef {
            position: opts.position + rotate(anchor, opts.rotation),
            rotation: opts.rotation,
            half_extents: Vec2::from(wheel_layout.half_extents),
            density: WHEEL_DENSITY,
            linvel: Vec2::ZERO,
            collision_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
            solver_groups: InteractionGroups::new(groups::CHASSIS, u32::MAX),
        });
        let kind = if wheel_layout.steerable {
            JointKind::Revolute
        } else {
            JointKind::Fixed
        };
        let joint = physics.create_joint(kind, chassis_body, body, anchor, Vec2::ZERO);
        let wheel = world.wheels.spawn(
            vehicle,
            body,
            JointBinding::Attached(joint),
            wheel_layout.steerable,
            wheel_layout.driven,
        );
        world.body_owners.insert(body, BodyOwner::Wheel(wheel));
    }

    // Fill every declared slot, then freeze the health baseline
    let fill = FillOptions {
        team: Some(opts.team),
        owner: Some(vehicle),
        toughness: None,
    };
    for slot_idx in 0..world.slots.count() {
        let slot = SlotId(slot_idx as u32);
        if world.parent_vehicle(world.slots.parents[slot_idx]) == vehicle
            && !world.slots.is_filled(slot)
        {
            fill_slot(world, physics, cfg, slot, &fill);
        }
    }
    world.vehicles.initial_parts[vehicle.0 as usize] = world.attached_part_count(vehicle);

    update_slot_brightness(world, SlotParent::Chassis(vehicle), cfg);
    if let Some(turret) = world.vehicles.turrets[vehicle.0 as usize] {
        update_slot_brightness(world, SlotParent::Turret(turret), cfg);
    }

    tracing::info!(
        "Spawned {:?} {:?} for {:?}: {} parts",
        opts.class,
        vehicle,
        opts.team,
        world.vehicles.initial_parts[vehicle.0 as usize]
    );

    vehicle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_layouts_fit_capacity() {
        let cfg = EngineConfig::default();
        for class in [
            VehicleClass::LightTank,
            VehicleClass::MediumTank,
            VehicleClass::HeavyTank,
            VehicleClass::PlayerTank,
            VehicleClass::Harvester,
            VehicleClass::MeleeCar,
        ] {
            let layout = VehicleLayout::for_class(class);
            assert!(layout.validate(&cfg).is_ok(), "{:?}", class);
        }
    }

    #[test]
    fn test_tank_layouts_have_turret_and_tracks() {
        let layout = VehicleLayout::for_class(VehicleClass::MediumTank);
        assert!(layout.turret.is_some());
        assert_eq!(layout.tracks.len(), 2);
        assert!(layout.wheels.is_empty());
    }

    #[test]
    fn test_wheeled_layouts_have_a_steerable_axle() {
        let layout = VehicleLayout::for_class(VehicleClass::Harvester);
        assert!(layout.turret.is_none());
        assert!(layout.wheels.iter().any(|w| w.steerable));
        assert!(layout.wheels.iter().any(|w| !w.steerable));
    }

    #[test]
    fn test_track_links_stay_within_half_length() {
        let layout = VehicleLayout::for_class(VehicleClass::HeavyTank);
        for track in &layout.tracks {
            let half = track.length * 0.5;
            for slot in &track.slots {
                assert!(slot.x.abs() <= half);
            }
        }
    }

    #[test]
    fn test_layout_roundtrip_through_toml() {
        let layout = VehicleLayout::for_class(VehicleClass::LightTank);
        let text = toml::to_string(&layout).unwrap();
        let parsed = VehicleLayout::from_toml_str(&text).unwrap();
        assert_eq!(parsed.chassis_slots.len(), layout.chassis_slots.len());
        assert_eq!(
            parsed.turret.unwrap().slots.len(),
            layout.turret.unwrap().slots.len()
        );
    }

    #[test]
    fn test_handwritten_toml_layout_parses() {
        let text = r#"
chassis_half_extents = [2.0, 1.5]
chassis_density = 5.0

[[chassis_slots]]
x = 0.0
y = 1.5
w = 1.0
h = 0.4
kind = "HullPlate"

[[wheels]]
anchor = [1.5, 1.8]
half_extents = [0.5, 0.3]
steerable = true
driven = true
"#;
        let layout = VehicleLayout::from_toml_str(text).unwrap();
        assert_eq!(layout.chassis_slots.len(), 1);
        assert_eq!(layout.wheels.len(), 1);
        assert!(layout.turret.is_none());
    }

    #[test]
    fn test_overdeclared_layout_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.max_children_per_parent = 2;
        let layout = VehicleLayout::for_class(VehicleClass::MediumTank);
        assert!(layout.validate(&cfg).is_err());
    }
}
