//! Slot registry: static part configuration
//!
//! Every (part kind, vehicle class) pair maps to one profile row: density,
//! collision/solver masks, render depth, and shadow strength. The table is
//! an exhaustive match, so an unknown pair cannot compile: the registry is
//! complete by construction rather than checked at runtime.

use crate::core::types::{PartKind, VehicleClass};
use crate::physics::host::InteractionGroups;

/// Collision group bits shared by the whole engine
pub mod groups {
    /// Vehicle chassis and sub-assembly bodies
    pub const CHASSIS: u32 = 1 << 0;
    /// Armor/track parts while attached to an assembly
    pub const PART: u32 = 1 << 1;
    /// Torn-off parts tumbling free
    pub const DEBRIS: u32 = 1 << 2;
    /// Projectiles
    pub const BULLET: u32 = 1 << 3;
    /// Static world geometry
    pub const TERRAIN: u32 = 1 << 4;
}

/// Collision filtering for an attached part: hit by bullets and foreign
/// hulls, protected from its own assembly's chassis and sibling parts
pub const fn attached_part_groups() -> InteractionGroups {
    InteractionGroups::new(groups::PART, groups::BULLET | groups::TERRAIN)
}

/// Solver filtering for an attached part: the joint holds it, the solver
/// must not also push it off its own chassis
pub const fn attached_part_solver_groups() -> InteractionGroups {
    InteractionGroups::new(groups::PART, groups::BULLET | groups::TERRAIN)
}

/// Team-agnostic filtering for debris: collides with everything
pub const fn debris_groups() -> InteractionGroups {
    InteractionGroups::new(groups::DEBRIS, u32::MAX)
}

/// One row of the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartProfile {
    /// Mass density handed to the physics host at body creation
    pub density: f32,
    /// Collision filtering while attached
    pub collision_groups: InteractionGroups,
    /// Solver filtering while attached
    pub solver_groups: InteractionGroups,
    /// Draw-order depth for the render view; higher draws on top
    pub render_depth: f32,
    /// Drop-shadow strength, 0 = none
    pub shadow: f32,
}

impl PartProfile {
    /// Look up the profile for a part kind on a vehicle class
    pub fn lookup(kind: PartKind, class: VehicleClass) -> PartProfile {
        use PartKind::*;
        use VehicleClass::*;

        let density = match (kind, class) {
            (HullPlate, LightTank) => 2.0,
            (HullPlate, MediumTank) => 3.0,
            (HullPlate, HeavyTank) => 4.5,
            (HullPlate, PlayerTank) => 3.0,
            (HullPlate, Harvester) => 2.5,
            (HullPlate, MeleeCar) => 1.5,

            (TurretPlate, HeavyTank) => 4.0,
            (TurretPlate, _) => 2.5,

            // Track links are light so tread motion stays cheap for the
            // solver even on heavy hulls
            (TrackLink, HeavyTank) => 1.2,
            (TrackLink, _) => 0.8,

            (ShieldPlate, _) => 0.5,
        };

        let (render_depth, shadow) = match kind {
            HullPlate => (2.0, 0.6),
            TurretPlate => (4.0, 0.8),
            TrackLink => (1.0, 0.3),
            ShieldPlate => (5.0, 0.0),
        };

        PartProfile {
            density,
            collision_groups: attached_part_groups(),
            solver_groups: attached_part_solver_groups(),
            render_depth,
            shadow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [PartKind; 4] = [
        PartKind::HullPlate,
        PartKind::TurretPlate,
        PartKind::TrackLink,
        PartKind::ShieldPlate,
    ];

    const ALL_CLASSES: [VehicleClass; 6] = [
        VehicleClass::LightTank,
        VehicleClass::MediumTank,
        VehicleClass::HeavyTank,
        VehicleClass::PlayerTank,
        VehicleClass::Harvester,
        VehicleClass::MeleeCar,
    ];

    #[test]
    fn test_every_pair_has_positive_density() {
        for kind in ALL_KINDS {
            for class in ALL_CLASSES {
                let profile = PartProfile::lookup(kind, class);
                assert!(profile.density > 0.0, "{:?}/{:?}", kind, class);
            }
        }
    }

    #[test]
    fn test_heavier_hulls_have_denser_plates() {
        let light = PartProfile::lookup(PartKind::HullPlate, VehicleClass::LightTank);
        let heavy = PartProfile::lookup(PartKind::HullPlate, VehicleClass::HeavyTank);
        assert!(heavy.density > light.density);
    }

    #[test]
    fn test_attached_parts_ignore_sibling_parts() {
        let profile = PartProfile::lookup(PartKind::HullPlate, VehicleClass::MediumTank);
        assert_eq!(profile.collision_groups.filter & groups::PART, 0);
        assert_eq!(profile.collision_groups.filter & groups::CHASSIS, 0);
    }

    #[test]
    fn test_debris_collides_with_everything() {
        assert_eq!(debris_groups().filter, u32::MAX);
    }
}
