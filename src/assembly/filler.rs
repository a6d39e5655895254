//! Physical instantiation of parts into slots
//!
//! `fill_slot` turns declared slot geometry into a live rigid body welded
//! to the slot's parent. Filling an already-filled slot is a no-op, so
//! regeneration code can call it blindly over a whole layout.

use glam::Vec2;

use crate::assembly::world::{AssemblyWorld, BodyOwner, SlotParent};
use crate::core::config::EngineConfig;
use crate::core::types::{FillerId, SlotId, Team, VehicleId};
use crate::physics::binding::JointBinding;
use crate::physics::host::{rotate, BodyDef, JointKind, PhysicsHost};
use crate::registry::PartProfile;

/// Combat attributes stamped onto a freshly created filler
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions {
    pub team: Option<Team>,
    pub owner: Option<VehicleId>,
    /// Damage capacity; defaults to footprint area * toughness_per_area
    pub toughness: Option<f32>,
}

/// Base part color for a combat side
pub fn team_color(team: Option<Team>) -> [f32; 4] {
    match team {
        Some(Team::Red) => [0.75, 0.22, 0.17, 1.0],
        Some(Team::Blue) => [0.20, 0.35, 0.80, 1.0],
        None => [0.45, 0.45, 0.45, 1.0],
    }
}

/// Instantiate a part into an empty slot
///
/// Looks up the registry row for the slot's part kind, spawns a rectangular
/// body at the slot's world-space anchor, welds it to the slot's parent, and
/// stamps the combat attributes from `opts`. Returns `None` without side
/// effects when the slot is already filled or the parent body is gone.
pub fn fill_slot(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    cfg: &EngineConfig,
    slot: SlotId,
    opts: &FillOptions,
) -> Option<FillerId> {
    let idx = slot.0 as usize;
    if world.slots.fillers[idx].is_some() {
        return None;
    }

    let parent = world.slots.parents[idx];
    let parent_body = world.parent_body(parent);
    // A dead parent handle means the assembly is mid-teardown; skip quietly
    let parent_state = physics.body_state(parent_body)?;

    let vehicle = world.parent_vehicle(parent);
    let class = world.vehicles.classes[vehicle.0 as usize];
    let kind = world.slots.kinds[idx];
    let profile = PartProfile::lookup(kind, class);

    let anchor = world.slots.anchors[idx];
    let half_extents = world.slots.half_extents[idx];

    let body = physics.create_body(&BodyDef {
        position: parent_state.translation + rotate(anchor, parent_state.rotation),
        rotation: parent_state.rotation,
        half_extents,
        density: profile.density,
        linvel: parent_state.linvel,
        collision_groups: profile.collision_groups,
        solver_groups: profile.solver_groups,
    });

    let joint = physics.create_joint(JointKind::Fixed, parent_body, body, anchor, Vec2::ZERO);

    let area = 4.0 * half_extents.x * half_extents.y;
    let toughness = opts
        .toughness
        .unwrap_or(area * cfg.toughness_per_area);

    let filler = world.fillers.spawn(
        slot,
        body,
        opts.team,
        opts.owner,
        toughness,
        JointBinding::Attached(joint),
        world.parent_track(parent),
        team_color(opts.team),
    );

    world.slots.fillers[idx] = Some(filler);
    world.body_owners.insert(body, BodyOwner::Filler(filler));

    tracing::debug!(
        "Filled slot {:?} on {:?} with part {:?} (toughness {:.1})",
        slot,
        parent,
        filler,
        toughness
    );

    Some(filler)
}

/// Re-shade every filled child of a parent by a small per-index offset
///
/// Keeps adjacent plates visually distinguishable. Deterministic in the
/// child index, so repeated passes converge instead of drifting.
pub fn update_slot_brightness(world: &mut AssemblyWorld, parent: SlotParent, cfg: &EngineConfig) {
    let vehicle = world.parent_vehicle(parent);
    let base = team_color(Some(world.vehicles.teams[vehicle.0 as usize]));

    let filled: Vec<(usize, FillerId)> = world
        .child_list(parent)
        .iter()
        .filter_map(|slot| world.slots.fillers[slot.0 as usize])
        .enumerate()
        .collect();

    for (index, filler) in filled {
        let offset = cfg.brightness_step * (index % 5) as f32;
        let color = &mut world.fillers.colors[filler.0 as usize];
        for channel in 0..3 {
            color[channel] = (base[channel] + offset).min(1.0);
        }
        color[3] = base[3];
    }
}
