//! Turret and steerable-wheel motor control
//!
//! Two-phase: a cheap per-tick intent pass turns commanded direction into a
//! normalized target angle, and a batched apply pass pushes changed targets
//! to the physics host. The apply pass runs only when the change set is
//! non-empty, so an idle battlefield costs no host calls at all.

use crate::assembly::world::AssemblyWorld;
use crate::core::config::EngineConfig;
use crate::core::types::{normalize_angle, TurretId, WheelId};
use crate::physics::host::PhysicsHost;
use crate::simulation::context::{MotorEntity, TickContext};

/// Targets closer than this are considered unchanged and skip the host
const TARGET_EPSILON: f32 = 1e-6;

/// Compute this tick's motor target for every turret and steerable wheel
///
/// Target = current angle relative to the chassis, advanced by
/// commanded direction * rotation cap * dt, normalized to `(-PI, PI]`.
/// Entities whose target moved land in the motor change set.
pub fn update_motor_targets(
    world: &mut AssemblyWorld,
    physics: &dyn PhysicsHost,
    ctx: &mut TickContext,
    dt_ms: f32,
) {
    let dt = dt_ms / 1000.0;

    for turret_idx in 0..world.turrets.count() {
        let vehicle = world.turrets.vehicles[turret_idx];
        if !world.vehicles.alive[vehicle.0 as usize] {
            continue;
        }
        if !world.turrets.joints[turret_idx].is_attached() {
            continue;
        }
        let Some(turret_state) = physics.body_state(world.turrets.bodies[turret_idx]) else {
            continue;
        };
        let Some(chassis_state) = physics.body_state(world.vehicles.bodies[vehicle.0 as usize])
        else {
            continue;
        };

        let relative = normalize_angle(turret_state.rotation - chassis_state.rotation);
        let cap = world.vehicles.classes[vehicle.0 as usize].turret_rotation_cap();
        let target = normalize_angle(relative + world.turrets.commanded[turret_idx] * cap * dt);

        world.turrets.pending_target[turret_idx] = Some(target);
        if target_changed(world.turrets.applied_target[turret_idx], target) {
            ctx.mark_motor_dirty(MotorEntity::Turret(TurretId(turret_idx as u32)));
        }
    }

    for wheel_idx in 0..world.wheels.count() {
        if !world.wheels.steerable[wheel_idx] {
            continue;
        }
        let vehicle = world.wheels.vehicles[wheel_idx];
        if !world.vehicles.alive[vehicle.0 as usize] {
            continue;
        }
        if !world.wheels.joints[wheel_idx].is_attached() {
            continue;
        }
        let Some(wheel_state) = physics.body_state(world.wheels.bodies[wheel_idx]) else {
            continue;
        };
        let Some(chassis_state) = physics.body_state(world.vehicles.bodies[vehicle.0 as usize])
        else {
            continue;
        };

        let relative = normalize_angle(wheel_state.rotation - chassis_state.rotation);
        let cap = world.vehicles.classes[vehicle.0 as usize].turret_rotation_cap();
        let target = normalize_angle(relative + world.wheels.commanded[wheel_idx] * cap * dt);

        world.wheels.pending_target[wheel_idx] = Some(target);
        if target_changed(world.wheels.applied_target[wheel_idx], target) {
            ctx.mark_motor_dirty(MotorEntity::Wheel(WheelId(wheel_idx as u32)));
        }
    }
}

fn target_changed(applied: Option<f32>, pending: f32) -> bool {
    match applied {
        None => true,
        Some(applied) => (pending - applied).abs() > TARGET_EPSILON,
    }
}

/// Push every changed motor target to the host, then clear the change set
///
/// This is the motor set's only consumer, so clearing here satisfies the
/// once-per-tick clear rule. Returns the number of host writes made.
pub fn apply_motor_targets(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    ctx: &mut TickContext,
    cfg: &EngineConfig,
) -> usize {
    if ctx.motor_dirty.is_empty() {
        return 0;
    }

    let mut applied = 0;
    for entity in ctx.motor_dirty.drain(..) {
        match entity {
            MotorEntity::Turret(t) => {
                let idx = t.0 as usize;
                let (Some(joint), Some(target)) = (
                    world.turrets.joints[idx].handle(),
                    world.turrets.pending_target[idx],
                ) else {
                    continue;
                };
                physics.set_joint_motor(joint, target, cfg.motor_stiffness, cfg.motor_damping);
                world.turrets.applied_target[idx] = Some(target);
                applied += 1;
            }
            MotorEntity::Wheel(w) => {
                let idx = w.0 as usize;
                let (Some(joint), Some(target)) = (
                    world.wheels.joints[idx].handle(),
                    world.wheels.pending_target[idx],
                ) else {
                    continue;
                };
                physics.set_joint_motor(joint, target, cfg.motor_stiffness, cfg.motor_damping);
                world.wheels.applied_target[idx] = Some(target);
                applied += 1;
            }
        }
    }
    applied
}
