//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::{Deserialize, Serialize};

/// How a qualifying contact converts into accumulated damage
///
/// The two variants reflect the two generations of the damage model in the
/// source material; both accumulate against a per-part toughness threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DamageModel {
    /// Every qualifying contact adds a fixed unit of damage
    UnitPerHit,
    /// Bullet contacts add caliber * caliber_damage_factor; everything
    /// else falls back to the fixed unit
    CaliberScaled,
}

/// Configuration for the assembly and damage systems
///
/// These values have been tuned against the standard layouts. Changing them
/// shifts how quickly vehicles shed parts and how the tracks read on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // === DAMAGE ===
    /// Minimum contact force magnitude that registers as damage
    ///
    /// Contacts below this are solver jitter and resting contact noise.
    /// At 900.0, a bullet at full speed or a ram at drive speed qualifies,
    /// while parts settling against each other never do.
    pub impact_force_threshold: f32,

    /// Which accumulation formula converts a qualifying contact to damage
    pub damage_model: DamageModel,

    /// Damage added per qualifying contact under `UnitPerHit`
    pub unit_damage: f32,

    /// Damage per unit of bullet caliber under `CaliberScaled`
    ///
    /// A 12-caliber shell at 0.25 deals 3.0 per hit, tearing a standard
    /// hull plate (toughness 4.0) off in two hits.
    pub caliber_damage_factor: f32,

    /// Toughness granted per square unit of part footprint
    ///
    /// Part toughness defaults to `w * h * toughness_per_area` so bigger
    /// plates soak more hits. Fill options may override per part.
    pub toughness_per_area: f32,

    /// Score awarded to the opposing side per torn-off part
    pub score_per_tearoff: u32,

    // === HEALTH ===
    /// Lower edge of the health smoothstep curve
    ///
    /// Health is smoothstep(health_smooth_threshold, 1.0, attached/initial).
    /// At 0.2, a vehicle reads as dead once fewer than a fifth of its parts
    /// remain, and early losses cost less than late ones.
    pub health_smooth_threshold: f32,

    // === TRACKS ===
    /// Contribution of angular velocity to belt speed, in units per radian
    ///
    /// Sign-inverted between the left and right track so a turning vehicle
    /// counter-rotates its treads.
    pub track_turn_factor: f32,

    /// Minimum perceptible belt step in world units
    ///
    /// Belt motion below one quantum per tick is discarded as jitter;
    /// larger motion is truncated to a whole number of quanta so every
    /// link on a track advances by exactly the same amount.
    pub track_step_quantum: f32,

    // === MOTORS ===
    /// Joint motor stiffness pushed with every target write
    pub motor_stiffness: f32,

    /// Joint motor damping pushed with every target write
    pub motor_damping: f32,

    // === ASSEMBLY ===
    /// Maximum slots attachable to a single parent body
    ///
    /// Layouts are fixed at design time; exceeding this is a layout bug
    /// and fails fast rather than silently dropping a part.
    pub max_children_per_parent: usize,

    /// Per-index color offset applied by the brightness pass
    ///
    /// Small enough that neighboring plates stay the same family of color
    /// while remaining individually distinguishable.
    pub brightness_step: f32,

    // === GUNS ===
    /// Muzzle velocity for spawned bullets, world units per second
    pub bullet_speed: f32,

    /// Minimum milliseconds between shots from one gun
    pub gun_cooldown_ms: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            impact_force_threshold: 900.0,
            damage_model: DamageModel::UnitPerHit,
            unit_damage: 1.0,
            caliber_damage_factor: 0.25,
            toughness_per_area: 0.5,
            score_per_tearoff: 100,

            health_smooth_threshold: 0.2,

            track_turn_factor: 0.35,
            track_step_quantum: 0.5,

            motor_stiffness: 20_000.0,
            motor_damping: 900.0,

            max_children_per_parent: 32,
            brightness_step: 0.03,

            bullet_speed: 600.0,
            gun_cooldown_ms: 450.0,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.impact_force_threshold <= 0.0 {
            return Err("impact_force_threshold must be positive".into());
        }

        if self.unit_damage <= 0.0 || self.caliber_damage_factor <= 0.0 {
            return Err("damage increments must be positive".into());
        }

        if self.toughness_per_area <= 0.0 {
            return Err("toughness_per_area must be positive".into());
        }

        // Threshold of 1.0 would make health 0 at any part count
        if !(0.0..1.0).contains(&self.health_smooth_threshold) {
            return Err(format!(
                "health_smooth_threshold ({}) must be in [0, 1)",
                self.health_smooth_threshold
            ));
        }

        if self.track_step_quantum <= 0.0 {
            return Err("track_step_quantum must be positive".into());
        }

        if self.motor_stiffness <= 0.0 || self.motor_damping < 0.0 {
            return Err("motor stiffness/damping out of range".into());
        }

        if self.max_children_per_parent == 0 {
            return Err("max_children_per_parent must be at least 1".into());
        }

        Ok(())
    }
}
