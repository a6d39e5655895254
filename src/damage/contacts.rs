//! Contact-force intake
//!
//! Converts the host's per-step contact-force events into accumulated
//! damage on whatever damage-capable entities the bodies resolve to, and
//! feeds the per-tick damage change set that the tear-off pass consumes.

use crate::assembly::world::{AssemblyWorld, BodyOwner};
use crate::core::config::{DamageModel, EngineConfig};
use crate::core::types::Team;
use crate::physics::host::{BodyHandle, ContactForceEvent};
use crate::simulation::context::{DamageTarget, TickContext};

/// The team standing behind a body, for attribution of the hit
fn body_team(world: &AssemblyWorld, body: BodyHandle) -> Option<Team> {
    match world.body_owners.get(&body)? {
        BodyOwner::Chassis(v) => Some(world.vehicles.teams[v.0 as usize]),
        BodyOwner::Turret(t) => Some(world.vehicles.teams[world.turrets.vehicles[t.0 as usize].0 as usize]),
        BodyOwner::Track(t) => Some(world.vehicles.teams[world.tracks.vehicles[t.0 as usize].0 as usize]),
        BodyOwner::Wheel(w) => Some(world.vehicles.teams[world.wheels.vehicles[w.0 as usize].0 as usize]),
        BodyOwner::Filler(f) => world.fillers.teams[f.0 as usize],
        BodyOwner::Bullet(b) => {
            if world.bullets.alive[b.0 as usize] {
                Some(world.bullets.teams[b.0 as usize])
            } else {
                None
            }
        }
    }
}

/// Damage one contact adds under the configured model
fn damage_amount(world: &AssemblyWorld, cfg: &EngineConfig, instigator: BodyHandle) -> f32 {
    match cfg.damage_model {
        DamageModel::UnitPerHit => cfg.unit_damage,
        DamageModel::CaliberScaled => match world.body_owners.get(&instigator) {
            Some(BodyOwner::Bullet(b)) => {
                world.bullets.calibers[b.0 as usize] * cfg.caliber_damage_factor
            }
            _ => cfg.unit_damage,
        },
    }
}

/// Apply one side of a contact: `body` takes the hit, `other` dealt it
fn apply_hit(
    world: &mut AssemblyWorld,
    ctx: &mut TickContext,
    cfg: &EngineConfig,
    body: BodyHandle,
    other: BodyHandle,
) {
    let Some(owner) = world.body_owners.get(&body).copied() else {
        return;
    };
    match owner {
        BodyOwner::Filler(f) => {
            let amount = damage_amount(world, cfg, other);
            let idx = f.0 as usize;
            world.fillers.damage[idx] += amount;
            world.fillers.last_instigator[idx] = body_team(world, other);
            ctx.mark_damaged(DamageTarget::Filler(f));
            tracing::debug!(
                "Filler {:?} took {:.2} damage ({:.2}/{:.2})",
                f,
                amount,
                world.fillers.damage[idx],
                world.fillers.toughness[idx]
            );
        }
        // Any qualifying contact spends a bullet
        BodyOwner::Bullet(b) => {
            if world.bullets.alive[b.0 as usize] {
                ctx.mark_damaged(DamageTarget::Bullet(b));
            }
        }
        // Chassis and sub-assembly bodies carry no damage capacity
        _ => {}
    }
}

/// Feed a step's contact-force events through the damage model
///
/// Events below the force threshold are solver noise and ignored. Both
/// bodies of a qualifying contact are treated symmetrically; whether either
/// accumulates damage depends on what its handle resolves to.
pub fn ingest_contacts(
    world: &mut AssemblyWorld,
    ctx: &mut TickContext,
    cfg: &EngineConfig,
    events: &[ContactForceEvent],
) {
    for event in events {
        if event.total_force_magnitude < cfg.impact_force_threshold {
            continue;
        }
        apply_hit(world, ctx, cfg, event.body_a, event.body_b);
        apply_hit(world, ctx, cfg, event.body_b, event.body_a);
    }
}
