//! Per-tick change-detection state
//!
//! One `TickContext` exists per simulation instance and is threaded through
//! every system explicitly. The sets collect what changed during a tick and
//! are cleared exactly once after all of their consumers have run, never
//! mid-tick and never from a hidden global.

use crate::core::types::{BulletId, FillerId, TurretId, WheelId};

/// An entity whose accumulated damage changed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTarget {
    Filler(FillerId),
    Bullet(BulletId),
}

/// A sub-assembly whose pending motor target changed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorEntity {
    Turret(TurretId),
    Wheel(WheelId),
}

/// Change sets and queues scoped to one simulation instance
#[derive(Debug, Default)]
pub struct TickContext {
    /// Completed tick count
    pub tick: u64,
    /// Entities damaged since the last clear; insertion-ordered, deduplicated
    pub damaged: Vec<DamageTarget>,
    /// Motor targets that differ from the last host write
    pub motor_dirty: Vec<MotorEntity>,
    /// Bullets scheduled for full removal during cleanup
    pub despawn_bullets: Vec<BulletId>,
}

impl TickContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a damage change; repeat marks within a tick collapse so each
    /// entity is processed at most once
    pub fn mark_damaged(&mut self, target: DamageTarget) {
        if !self.damaged.contains(&target) {
            self.damaged.push(target);
        }
    }

    /// Record a changed motor target, deduplicated like the damage set
    pub fn mark_motor_dirty(&mut self, entity: MotorEntity) {
        if !self.motor_dirty.contains(&entity) {
            self.motor_dirty.push(entity);
        }
    }

    /// End-of-tick clear; the motor set is cleared by its apply system,
    /// everything else here
    pub fn end_tick(&mut self) {
        self.damaged.clear();
        self.despawn_bullets.clear();
        self.tick += 1;
    }
}
