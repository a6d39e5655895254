//! Render view of the assembly world
//!
//! Read-only snapshot surface for the rendering collaborator: transforms,
//! footprints, colors, and depth/shadow per part. This module never
//! modifies simulation state.

use glam::Vec2;

use crate::assembly::world::AssemblyWorld;
use crate::physics::host::PhysicsHost;
use crate::registry::PartProfile;

/// Lightweight snapshot of one part for rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderPart {
    pub position: Vec2,
    pub rotation: f32,
    pub half_extents: Vec2,
    pub color: [f32; 4],
    /// Draw-order depth; higher draws on top
    pub depth: f32,
    /// Drop-shadow strength, 0 = none
    pub shadow: f32,
}

/// Collect every live part (attached or debris) into a reusable buffer.
/// Call once per frame, passing the same buffer to avoid allocations.
pub fn collect_render_parts(
    world: &AssemblyWorld,
    physics: &dyn PhysicsHost,
    buffer: &mut Vec<RenderPart>,
) {
    buffer.clear();

    for filler_idx in 0..world.fillers.count() {
        let Some(state) = physics.body_state(world.fillers.bodies[filler_idx]) else {
            continue;
        };

        // Depth and shadow come from the registry row the part was built
        // from; the slot back-reference survives tear-off
        let slot = world.fillers.slots[filler_idx];
        let kind = world.slots.kinds[slot.0 as usize];
        let vehicle = world.parent_vehicle(world.slots.parents[slot.0 as usize]);
        let class = world.vehicles.classes[vehicle.0 as usize];
        let profile = PartProfile::lookup(kind, class);

        buffer.push(RenderPart {
            position: state.translation,
            rotation: state.rotation,
            half_extents: world.slots.half_extents[slot.0 as usize],
            color: world.fillers.colors[filler_idx],
            depth: profile.render_depth,
            shadow: profile.shadow,
        });
    }
}
