//! Track animation: rolling treads from discrete rigid links
//!
//! Per tick, each track derives a scalar belt speed from its body's motion,
//! quantizes it, and slides every filled link slot along the track's long
//! axis, wrapping at the half-length so the belt cycles. The link joints
//! are re-anchored in place, never destroyed, which is what makes the
//! tread appear to roll.

use crate::assembly::world::AssemblyWorld;
use crate::core::config::EngineConfig;
use crate::core::types::TrackId;
use crate::physics::host::{rotate, PhysicsHost};
use glam::Vec2;

/// Truncate a raw belt advance to whole perceptible quanta
///
/// Sub-quantum motion is solver jitter and maps to zero; anything larger
/// becomes an exact multiple so every link moves identically.
pub fn quantize_step(raw: f32, quantum: f32) -> f32 {
    (raw / quantum).trunc() * quantum
}

/// Wrap a longitudinal coordinate into [-length/2, length/2]
///
/// Crossing either end re-enters from the opposite sign, closing the loop.
pub fn wrap_longitudinal(mut x: f32, length: f32) -> f32 {
    let half = length * 0.5;
    while x > half {
        x -= length;
    }
    while x < -half {
        x += length;
    }
    x
}

/// Belt speed of one track from its body's current motion
///
/// Forward-projected linear velocity plus the turn term, whose sign flips
/// between the left and right track.
fn belt_speed(
    world: &AssemblyWorld,
    physics: &dyn PhysicsHost,
    track: TrackId,
    cfg: &EngineConfig,
) -> Option<f32> {
    let state = physics.body_state(world.tracks.bodies[track.0 as usize])?;
    let forward = rotate(Vec2::X, state.rotation);
    let linear = state.linvel.dot(forward);
    let side = world.tracks.sides[track.0 as usize];
    Some(linear + side.turn_sign() * cfg.track_turn_factor * state.angvel)
}

/// Advance every track's filled link slots by this tick's quantized step
pub fn animate_tracks(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    cfg: &EngineConfig,
    dt_secs: f32,
) {
    for track_idx in 0..world.tracks.count() {
        let track = TrackId(track_idx as u32);
        let Some(speed) = belt_speed(world, physics, track, cfg) else {
            continue;
        };
        let step = quantize_step(speed * dt_secs, cfg.track_step_quantum);
        if step == 0.0 {
            continue;
        }

        let length = world.tracks.lengths[track_idx];
        let slots: Vec<_> = world.tracks.slot_children[track_idx].iter().collect();
        for slot in slots {
            let slot_idx = slot.0 as usize;
            let Some(filler) = world.slots.fillers[slot_idx] else {
                continue;
            };

            let anchor = &mut world.slots.anchors[slot_idx];
            anchor.x = wrap_longitudinal(anchor.x + step, length);
            let new_anchor = *anchor;

            // Re-anchor the existing joint; a torn link keeps its slot
            // geometry but has no joint left to move
            if let Some(joint) = world.fillers.joints[filler.0 as usize].handle() {
                physics.set_joint_anchor(joint, new_anchor);
            }
        }
    }
}
