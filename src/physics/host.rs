//! World-agnostic physics host interface
//!
//! The constraint solver is an external collaborator. The engine talks to it
//! through this trait: body and joint creation, motor writes, re-anchoring,
//! collision-group changes, pose/velocity reads, and a per-step drain of
//! contact-force events. Reads on a dead handle return `None` and mutations
//! on one are required to no-op, which is what lets every engine system
//! check-then-act without a transaction layer.

use glam::Vec2;

/// Opaque handle to a rigid body owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// Opaque handle to a joint owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointHandle(pub u64);

/// Constraint flavor requested at joint creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    /// Rigid weld; used for armor plates, track links, and fixed wheels
    Fixed,
    /// Rotation about the anchor; used for turrets and steerable wheels
    Revolute,
}

/// Collision filtering as membership/filter bit masks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl InteractionGroups {
    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self {
            memberships,
            filter,
        }
    }

    /// Collides with everything, member of everything
    pub const fn all() -> Self {
        Self::new(u32::MAX, u32::MAX)
    }
}

/// Everything the engine needs to create a rectangular rigid body
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub position: Vec2,
    pub rotation: f32,
    pub half_extents: Vec2,
    pub density: f32,
    pub linvel: Vec2,
    pub collision_groups: InteractionGroups,
    pub solver_groups: InteractionGroups,
}

/// Pose and velocity snapshot read back after a step
#[derive(Debug, Clone, Copy)]
pub struct BodyState {
    pub translation: Vec2,
    pub rotation: f32,
    pub linvel: Vec2,
    pub angvel: f32,
}

/// One contact whose total force crossed the host's reporting threshold
#[derive(Debug, Clone, Copy)]
pub struct ContactForceEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub total_force_magnitude: f32,
}

/// Interface the constraint solver exposes to this engine
pub trait PhysicsHost {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Remove a body and any joints attached to it; no-op on a dead handle
    fn remove_body(&mut self, body: BodyHandle);

    fn create_joint(
        &mut self,
        kind: JointKind,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> JointHandle;

    /// Remove a joint; no-op on a dead handle
    fn remove_joint(&mut self, joint: JointHandle);

    /// Drive a revolute joint toward `target` radians; no-op on a dead handle
    fn set_joint_motor(&mut self, joint: JointHandle, target: f32, stiffness: f32, damping: f32);

    /// Move a joint's anchor on the parent body without recreating it;
    /// no-op on a dead handle
    fn set_joint_anchor(&mut self, joint: JointHandle, parent_anchor: Vec2);

    /// Swap a body's collision filtering; no-op on a dead handle
    fn set_collision_groups(&mut self, body: BodyHandle, groups: InteractionGroups);

    /// Pose and velocity of a body, or `None` once the handle is dead
    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;

    /// Advance the solver by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Contact-force events produced by the most recent step
    fn drain_contact_events(&mut self) -> Vec<ContactForceEvent>;
}

/// Rotate a local-frame offset into the world frame
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let v = rotate(Vec2::new(3.0, -2.0), 0.0);
        assert_eq!(v, Vec2::new(3.0, -2.0));
    }
}
