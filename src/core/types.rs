//! Core type definitions used throughout the engine
//!
//! Entities live in dense parallel tables; the id types here are plain
//! table indices wrapped in newtypes so they cannot be mixed up.

use serde::{Deserialize, Serialize};

/// Index of a vehicle in the vehicle table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

/// Index of a turret in the turret table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurretId(pub u32);

/// Index of a track in the track table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u32);

/// Index of a wheel in the wheel table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WheelId(pub u32);

/// Index of a slot in the slot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub u32);

/// Index of a filler (the part occupying a slot) in the filler table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FillerId(pub u32);

/// Index of a gun in the gun table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GunId(pub u32);

/// Index of a bullet in the bullet table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulletId(pub u32);

/// Vehicle chassis archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleClass {
    LightTank,
    MediumTank,
    HeavyTank,
    PlayerTank,
    Harvester,
    MeleeCar,
}

impl VehicleClass {
    /// Turret rotation speed cap in rad/s for this chassis
    pub fn turret_rotation_cap(&self) -> f32 {
        match self {
            VehicleClass::LightTank => 2.4,
            VehicleClass::MediumTank => 1.8,
            VehicleClass::HeavyTank => 1.2,
            VehicleClass::PlayerTank => std::f32::consts::FRAC_PI_2,
            // No turret on these, the cap only matters for steerable wheels
            VehicleClass::Harvester => 1.0,
            VehicleClass::MeleeCar => 3.0,
        }
    }
}

/// Drivetrain flavor, affects drive speed only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineClass {
    Piston,
    Turbine,
    Electric,
}

impl EngineClass {
    /// Top drive speed in world units per second
    pub fn max_drive_speed(&self) -> f32 {
        match self {
            EngineClass::Piston => 120.0,
            EngineClass::Turbine => 200.0,
            EngineClass::Electric => 150.0,
        }
    }
}

/// What kind of part a slot accepts; selects the registry row together
/// with the vehicle class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    HullPlate,
    TurretPlate,
    TrackLink,
    ShieldPlate,
}

/// Combat side; fillers and bullets without a team never score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Blue,
}

/// Which side of the chassis a track runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackSide {
    Left,
    Right,
}

impl TrackSide {
    /// Sign applied to the angular-velocity term of the belt speed
    pub fn turn_sign(&self) -> f32 {
        match self {
            TrackSide::Left => -1.0,
            TrackSide::Right => 1.0,
        }
    }
}

/// Normalize an angle to the half-open interval `(-PI, PI]`
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    if wrapped > std::f32::consts::PI {
        wrapped - std::f32::consts::TAU
    } else {
        wrapped
    }
}

/// Hermite smoothstep between `edge0` and `edge1`, clamped to [0, 1]
///
/// Used to soften derived vehicle health so the first lost part costs
/// less than the last one.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle_identity_in_range() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(1.0) - 1.0).abs() < 1e-6);
        assert!((normalize_angle(-1.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_boundaries() {
        // PI is included, -PI maps to PI
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_full_turns() {
        assert!(normalize_angle(TAU).abs() < 1e-6);
        assert!(normalize_angle(-3.0 * TAU).abs() < 1e-5);
        assert!((normalize_angle(5.0 * TAU + 0.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.2, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.2, 1.0, 0.2), 0.0);
        assert_eq!(smoothstep(0.2, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.2, 1.0, 1.5), 1.0);
    }

    #[test]
    fn test_smoothstep_midpoint() {
        // Hermite curve passes through 0.5 at the midpoint
        let mid = smoothstep(0.0, 1.0, 0.5);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_track_side_signs_oppose() {
        assert_eq!(TrackSide::Left.turn_sign(), -TrackSide::Right.turn_sign());
    }
}
