//! Tick system - orchestrates the per-frame pipeline
//!
//! Fixed order, single-threaded:
//! intent (motor targets, batched apply, gun fire) -> physics step ->
//! contact intake -> tear-offs -> track animation -> cosmetic brightness ->
//! cleanup (bullet despawn, change-set clears).
//!
//! Pipeline ordering is the only synchronization: each shared table is
//! mutated by one system per tick, and a part torn off this tick was hit
//! by the physics step that ran earlier in the same tick.

use crate::assembly::filler::update_slot_brightness;
use crate::assembly::world::{AssemblyWorld, SlotParent};
use crate::core::config::EngineConfig;
use crate::core::types::{BulletId, FillerId, SlotId, Team, TurretId, VehicleId};
use crate::damage::contacts::ingest_contacts;
use crate::damage::tearoff::process_tearoffs;
use crate::motion::motor::{apply_motor_targets, update_motor_targets};
use crate::motion::track::animate_tracks;
use crate::physics::host::PhysicsHost;
use crate::simulation::context::TickContext;
use crate::simulation::guns::fire_guns;

/// Events generated during one simulation tick, for the UI and scoring log
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A part came off an assembly
    PartTornOff {
        filler: FillerId,
        slot: SlotId,
        vehicle: Option<VehicleId>,
    },
    /// A tear-off was credited to an opposing team
    ScoreAwarded { team: Team, points: u32 },
    /// A turret's gun spawned a bullet
    ShotFired { turret: TurretId, bullet: BulletId },
    /// A bullet was removed from the world after dealing its hit
    BulletSpent { bullet: BulletId },
    /// A vehicle lost its last chassis/turret part this tick
    VehicleDisabled { vehicle: VehicleId },
}

/// Run a single simulation tick
///
/// `dt_ms` is the frame delta in milliseconds; the physics host steps in
/// seconds. Returns the events produced this tick in pipeline order.
pub fn run_tick(
    world: &mut AssemblyWorld,
    physics: &mut dyn PhysicsHost,
    ctx: &mut TickContext,
    cfg: &EngineConfig,
    dt_ms: f32,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let dt_secs = dt_ms / 1000.0;

    // Intent phase: translate commands into motor targets, flush the
    // changed ones, and let guns fire before the world moves
    update_motor_targets(world, physics, ctx, dt_ms);
    apply_motor_targets(world, physics, ctx, cfg);
    for (turret, bullet) in fire_guns(world, physics, cfg, dt_ms) {
        events.push(SimulationEvent::ShotFired { turret, bullet });
    }

    physics.step(dt_secs);

    // Detachment phase: read back this step's contacts, accumulate, tear off
    let contacts = physics.drain_contact_events();
    ingest_contacts(world, ctx, cfg, &contacts);
    let report = process_tearoffs(world, physics, ctx, cfg);

    for torn in &report.torn {
        events.push(SimulationEvent::PartTornOff {
            filler: torn.filler,
            slot: torn.slot,
            vehicle: torn.vehicle,
        });
        if let Some(team) = torn.scored_for {
            events.push(SimulationEvent::ScoreAwarded {
                team,
                points: cfg.score_per_tearoff,
            });
        }
    }
    for vehicle in &report.disabled {
        events.push(SimulationEvent::VehicleDisabled { vehicle: *vehicle });
    }

    animate_tracks(world, physics, cfg, dt_secs);

    // Cosmetic pass only where the part population changed
    for torn in &report.torn {
        if let Some(vehicle) = torn.vehicle {
            update_slot_brightness(world, SlotParent::Chassis(vehicle), cfg);
            if let Some(turret) = world.vehicles.turrets[vehicle.0 as usize] {
                update_slot_brightness(world, SlotParent::Turret(turret), cfg);
            }
        }
    }

    // Cleanup: spent bullets leave the world entirely
    let spent: Vec<BulletId> = ctx.despawn_bullets.clone();
    for bullet in spent {
        let idx = bullet.0 as usize;
        if !world.bullets.alive[idx] {
            continue;
        }
        world.bullets.alive[idx] = false;
        let body = world.bullets.bodies[idx];
        world.body_owners.remove(&body);
        physics.remove_body(body);
        events.push(SimulationEvent::BulletSpent { bullet });
    }

    ctx.end_tick();
    events
}
