//! Tear-off: irreversible detachment of over-damaged parts
//!
//! Runs strictly after contact intake within the same tick. Each step of
//! the tear-off checks its own precondition, so a partial or repeated
//! invocation degrades to a no-op instead of corrupting the assembly.

use crate::assembly::world::AssemblyWorld;
use crate::core::config::EngineConfig;
use crate::core::types::{BulletId, FillerId, SlotId, Team, VehicleId};
use crate::physics::host::PhysicsHost;
use crate::registry::debris_groups;
use crate::simulation::context::{DamageTarget, TickContext};

/// One completed tear-off, reported up to the tick pipeline
#[derive(Debug, Clone, Copy)]
pub struct TearOff {
    pub filler: FillerId,
    pub slot: SlotId,
    /// Vehicle the part belonged to, for health/disable bookkeeping
    pub vehicle: Option<VehicleId>,
    /// Team awarded score for the kill, when attribution applied
    pub scored_for: Option<Team>,
}

/// Everything the detachment pass did this tick
#[derive(Debug, Default)]
pub struct DetachmentReport {
    pub torn: Vec<TearOff>,
    /// Vehicles whose last chassis/turret part came off this tick
    pub disabled: Vec<VehicleId>,
}

/// Detach a filler from its assembly
///
/// Order matters: tags are stripped first so a mid-tick observer never
/// sees a scoring debris part, then the slot is vacated, then the joint
/// goes, then the collision group widens to the team-agnostic debris mask.
/// Returns false without side effects when the filler is already detached.
pub fn tear_off(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    filler: FillerId,
) -> bool {
    let idx = filler.0 as usize;
    if !world.fillers.joints[idx].is_attached() {
        return false;
    }

    world.fillers.teams[idx] = None;
    world.fillers.owners[idx] = None;

    // A refilled slot already points at a newer filler; leave it alone
    let slot = world.fillers.slots[idx];
    if world.slots.fillers[slot.0 as usize] == Some(filler) {
        world.slots.fillers[slot.0 as usize] = None;
    }

    if let Some(joint) = world.fillers.joints[idx].take() {
        physics.remove_joint(joint);
    }

    physics.set_collision_groups(world.fillers.bodies[idx], debris_groups());

    tracing::info!("Tore off filler {:?} from slot {:?}", filler, slot);
    true
}

/// Walk the damage change set and execute every due tear-off
///
/// Score goes to the instigating team only when the torn part still carried
/// a team of its own and the two differ; friendly fire detaches the part
/// but awards nothing. Damaged bullets are queued for removal instead of
/// being torn into debris.
pub fn process_tearoffs(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    ctx: &mut TickContext,
    cfg: &EngineConfig,
) -> DetachmentReport {
    let mut report = DetachmentReport::default();
    let mut touched_vehicles: Vec<VehicleId> = Vec::new();

    let targets: Vec<DamageTarget> = ctx.damaged.clone();
    for target in targets {
        match target {
            DamageTarget::Filler(filler) => {
                let idx = filler.0 as usize;
                if world.fillers.damage[idx] <= world.fillers.toughness[idx] {
                    continue;
                }

                // Attribution reads happen before tear-off strips the tags
                let part_team = world.fillers.teams[idx];
                let instigator = world.fillers.last_instigator[idx];
                let owner = world.fillers.owners[idx];
                let slot = world.fillers.slots[idx];

                if !tear_off(world, physics, filler) {
                    continue;
                }

                let scored_for = match (part_team, instigator) {
                    (Some(part), Some(hitter)) if part != hitter => {
                        world.score.award(hitter, cfg.score_per_tearoff);
                        Some(hitter)
                    }
                    _ => None,
                };

                if let Some(vehicle) = owner {
                    if !touched_vehicles.contains(&vehicle) {
                        touched_vehicles.push(vehicle);
                    }
                }

                report.torn.push(TearOff {
                    filler,
                    slot,
                    vehicle: owner,
                    scored_for,
                });
            }
            DamageTarget::Bullet(bullet) => {
                schedule_bullet_removal(world, ctx, bullet);
            }
        }
    }

    // A vehicle with nothing left attached is disabled exactly once
    for vehicle in touched_vehicles {
        let idx = vehicle.0 as usize;
        if world.vehicles.alive[idx] && world.attached_part_count(vehicle) == 0 {
            world.vehicles.alive[idx] = false;
            report.disabled.push(vehicle);
            tracing::info!("Vehicle {:?} disabled: no parts attached", vehicle);
        }
    }

    report
}

/// Queue a bullet for full removal during cleanup; never becomes debris
fn schedule_bullet_removal(world: &AssemblyWorld, ctx: &mut TickContext, bullet: BulletId) {
    if world.bullets.alive[bullet.0 as usize] && !ctx.despawn_bullets.contains(&bullet) {
        ctx.despawn_bullets.push(bullet);
    }
}
