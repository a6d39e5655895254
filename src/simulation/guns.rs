//! Gun firing: shoot intent into bullet bodies
//!
//! Bullets are ordinary damage-capable entities; once any qualifying
//! contact marks one, the detachment pipeline schedules it for full
//! removal rather than letting it become debris.

use glam::Vec2;

use crate::assembly::world::{AssemblyWorld, BodyOwner};
use crate::core::config::EngineConfig;
use crate::core::types::{BulletId, TurretId};
use crate::physics::host::{rotate, BodyDef, InteractionGroups, PhysicsHost};
use crate::registry::groups;

const BULLET_HALF_EXTENT: f32 = 0.15;
const BULLET_DENSITY: f32 = 2.0;

// Bullets hit hulls, parts, and debris; never each other
const BULLET_FILTER: u32 = groups::CHASSIS | groups::PART | groups::DEBRIS | groups::TERRAIN;

/// Spawn a bullet from every gun whose turret wants to shoot and is off
/// cooldown; returns (turret, bullet) pairs for event reporting
pub fn fire_guns(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    cfg: &EngineConfig,
    dt_ms: f32,
) -> Vec<(TurretId, BulletId)> {
    let mut fired = Vec::new();

    for gun_idx in 0..world.guns.turrets.len() {
        world.guns.since_fire_ms[gun_idx] += dt_ms;

        let turret = world.guns.turrets[gun_idx];
        let turret_idx = turret.0 as usize;
        if !world.turrets.shoot[turret_idx] {
            continue;
        }
        let vehicle = world.turrets.vehicles[turret_idx];
        if !world.vehicles.alive[vehicle.0 as usize] {
            continue;
        }
        if world.guns.since_fire_ms[gun_idx] < cfg.gun_cooldown_ms {
            continue;
        }
        let Some(state) = physics.body_state(world.turrets.bodies[turret_idx]) else {
            continue;
        };

        let muzzle = world.guns.muzzles[gun_idx];
        let direction = rotate(Vec2::X, state.rotation);
        let body = physics.create_body(&BodyDef {
            position: state.translation + rotate(muzzle, state.rotation),
            rotation: state.rotation,
            half_extents: Vec2::splat(BULLET_HALF_EXTENT),
            density: BULLET_DENSITY,
            linvel: state.linvel + direction * cfg.bullet_speed,
            collision_groups: InteractionGroups::new(groups::BULLET, BULLET_FILTER),
            solver_groups: InteractionGroups::new(groups::BULLET, BULLET_FILTER),
        });

        let bullet = world.bullets.spawn(
            body,
            world.vehicles.teams[vehicle.0 as usize],
            vehicle,
            world.guns.calibers[gun_idx],
        );
        world.body_owners.insert(body, BodyOwner::Bullet(bullet));
        world.guns.since_fire_ms[gun_idx] = 0.0;

        tracing::debug!("Turret {:?} fired bullet {:?}", turret, bullet);
        fired.push((turret, bullet));
    }

    fired
}
