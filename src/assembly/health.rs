//! Derived vehicle health
//!
//! Health is never stored; it is the attached chassis+turret part fraction
//! pushed through a smoothstep, recomputed on demand by the observation
//! and AI layers.

use crate::assembly::world::AssemblyWorld;
use crate::core::config::EngineConfig;
use crate::core::types::{smoothstep, VehicleId};

/// Health in [0, 1]: smoothstep over attached parts / initial parts
///
/// Exactly 0 once every chassis and turret slot is empty; 1 at spawn.
/// Monotone in the attached count, so tearing parts off can only lower it.
pub fn vehicle_health(world: &AssemblyWorld, vehicle: VehicleId, cfg: &EngineConfig) -> f32 {
    let initial = world.vehicles.initial_parts[vehicle.0 as usize];
    if initial == 0 {
        return 0.0;
    }
    let attached = world.attached_part_count(vehicle);
    smoothstep(
        cfg.health_smooth_threshold,
        1.0,
        attached as f32 / initial as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::world::BodyOwner;
    use crate::core::types::{EngineClass, Team, VehicleClass};
    use crate::physics::host::BodyHandle;

    #[test]
    fn test_health_zero_without_parts() {
        let cfg = EngineConfig::default();
        let mut world = AssemblyWorld::new(cfg.max_children_per_parent);
        let body = BodyHandle(0);
        let v = world.vehicles.spawn(
            VehicleClass::LightTank,
            EngineClass::Piston,
            Team::Red,
            body,
            cfg.max_children_per_parent,
        );
        world.body_owners.insert(body, BodyOwner::Chassis(v));
        // Nothing was ever filled, so the baseline is zero and so is health
        assert_eq!(vehicle_health(&world, v, &cfg), 0.0);
    }
}
