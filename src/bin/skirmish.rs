//! Headless skirmish - entry point for exercising the assembly engine
//!
//! Spawns two teams of composite vehicles on the kinematic host, drives
//! them at each other with a trivial controller, and synthesizes contact
//! events when bullets or hulls close in. Prints the score and surviving
//! part counts once the requested ticks have run.

use clap::Parser;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wreckage::assembly::{spawn_vehicle, vehicle_health, AssemblyWorld, SpawnOptions};
use wreckage::core::config::EngineConfig;
use wreckage::core::types::{EngineClass, Team, VehicleClass, VehicleId};
use wreckage::physics::host::PhysicsHost;
use wreckage::physics::kinematic::KinematicHost;
use wreckage::render::{collect_render_parts, RenderPart};
use wreckage::simulation::tick::{run_tick, SimulationEvent};
use wreckage::simulation::TickContext;

#[derive(Parser, Debug)]
#[command(name = "skirmish", about = "Headless composite-vehicle skirmish")]
struct Args {
    /// Simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Vehicles per team
    #[arg(long, default_value_t = 3)]
    vehicles: u32,

    /// Frame delta in milliseconds
    #[arg(long, default_value_t = 16.0)]
    dt_ms: f32,

    /// RNG seed for spawn placement
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let cfg = EngineConfig::default();
    cfg.validate().expect("default config must be consistent");

    let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
    let mut host = KinematicHost::new();
    let mut ctx = TickContext::new();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let classes = [
        VehicleClass::LightTank,
        VehicleClass::MediumTank,
        VehicleClass::HeavyTank,
    ];
    let mut fleet: Vec<VehicleId> = Vec::new();
    for team_idx in 0..2 {
        let (team, base_x) = if team_idx == 0 {
            (Team::Red, -80.0)
        } else {
            (Team::Blue, 80.0)
        };
        for i in 0..args.vehicles {
            let class = classes[(i as usize) % classes.len()];
            let position = Vec2::new(
                base_x + rng.gen_range(-10.0..10.0),
                (i as f32 - args.vehicles as f32 / 2.0) * 25.0 + rng.gen_range(-5.0..5.0),
            );
            fleet.push(spawn_vehicle(
                &mut world,
                &mut host,
                &cfg,
                &SpawnOptions {
                    class,
                    engine: EngineClass::Piston,
                    team,
                    position,
                    rotation: if team == Team::Red { 0.0 } else { std::f32::consts::PI },
                    layout: None,
                },
            ));
        }
    }

    tracing::info!(
        "Skirmish: {} vehicles, {} ticks at {} ms",
        fleet.len(),
        args.ticks,
        args.dt_ms
    );

    let mut render_buffer: Vec<RenderPart> = Vec::new();
    let mut torn_total = 0u32;
    let mut shots_total = 0u32;

    for _ in 0..args.ticks {
        drive_fleet(&mut world, &mut host, &fleet);
        synthesize_contacts(&world, &mut host, &cfg);

        for event in run_tick(&mut world, &mut host, &mut ctx, &cfg, args.dt_ms) {
            match event {
                SimulationEvent::PartTornOff { .. } => torn_total += 1,
                SimulationEvent::ShotFired { .. } => shots_total += 1,
                SimulationEvent::VehicleDisabled { vehicle } => {
                    tracing::info!("Vehicle {:?} is out of the fight", vehicle);
                }
                _ => {}
            }
        }

        collect_render_parts(&world, &host, &mut render_buffer);
    }

    println!("=== SKIRMISH OVER ===");
    println!(
        "score  red {:>5}  blue {:>5}",
        world.score.red, world.score.blue
    );
    println!("shots fired: {}   parts torn off: {}", shots_total, torn_total);
    for vehicle in fleet {
        println!(
            "  {:?} {:?}: health {:.2}, {} parts attached",
            world.vehicles.teams[vehicle.0 as usize],
            vehicle,
            vehicle_health(&world, vehicle, &cfg),
            world.attached_part_count(vehicle)
        );
    }
}

/// Point every live vehicle at the nearest enemy and roll toward it,
/// sweeping the turret and holding the trigger down once in range
fn drive_fleet(world: &mut AssemblyWorld, host: &mut KinematicHost, fleet: &[VehicleId]) {
    for &vehicle in fleet {
        let idx = vehicle.0 as usize;
        if !world.vehicles.alive[idx] {
            host.set_linvel(world.vehicles.bodies[idx], Vec2::ZERO);
            if let Some(turret) = world.vehicles.turrets[idx] {
                world.turrets.commanded[turret.0 as usize] = 0.0;
                world.turrets.shoot[turret.0 as usize] = false;
            }
            continue;
        }
        let Some(state) = host.body_state(world.vehicles.bodies[idx]) else {
            continue;
        };

        let team = world.vehicles.teams[idx];
        let nearest = fleet
            .iter()
            .filter(|other| {
                world.vehicles.teams[other.0 as usize] != team
                    && world.vehicles.alive[other.0 as usize]
            })
            .filter_map(|other| {
                host.body_state(world.vehicles.bodies[other.0 as usize])
                    .map(|s| s.translation)
            })
            .min_by(|a, b| {
                a.distance_squared(state.translation)
                    .partial_cmp(&b.distance_squared(state.translation))
                    .unwrap()
            });

        if let Some(target) = nearest {
            let to_target = target - state.translation;
            let speed = world.vehicles.engines[idx].max_drive_speed() * 0.25;
            if to_target.length() > 20.0 {
                host.set_linvel(
                    world.vehicles.bodies[idx],
                    to_target.normalize_or_zero() * speed,
                );
            } else {
                host.set_linvel(world.vehicles.bodies[idx], Vec2::ZERO);
            }

            if let Some(turret) = world.vehicles.turrets[idx] {
                let turret_idx = turret.0 as usize;
                world.turrets.commanded[turret_idx] = 1.0;
                world.turrets.shoot[turret_idx] = to_target.length() < 120.0;
            }
        }
    }
}

/// Stand-in for collision detection: bullets close to an enemy part, or
/// opposing hulls overlapping, register as over-threshold contacts
fn synthesize_contacts(world: &AssemblyWorld, host: &mut KinematicHost, cfg: &EngineConfig) {
    let force = cfg.impact_force_threshold * 2.0;

    for bullet_idx in 0..world.bullets.bodies.len() {
        if !world.bullets.alive[bullet_idx] {
            continue;
        }
        let bullet_body = world.bullets.bodies[bullet_idx];
        let Some(bullet_state) = host.body_state(bullet_body) else {
            continue;
        };
        let bullet_team = world.bullets.teams[bullet_idx];

        for filler_idx in 0..world.fillers.count() {
            if world.fillers.teams[filler_idx] == Some(bullet_team) {
                continue;
            }
            if !world.fillers.joints[filler_idx].is_attached() {
                continue;
            }
            let part_body = world.fillers.bodies[filler_idx];
            let Some(part_state) = host.body_state(part_body) else {
                continue;
            };
            if bullet_state.translation.distance(part_state.translation) < 2.0 {
                host.inject_contact(part_body, bullet_body, force);
                break;
            }
        }
    }
}
