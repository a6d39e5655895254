//! Deterministic in-process physics host
//!
//! A minimal `PhysicsHost` for tests and the headless demo: bodies integrate
//! their velocities, fixed and revolute joints snap children to their parent
//! anchor after integration, and contact-force events are injected by the
//! caller rather than detected. No collision response, no solver; just
//! enough bookkeeping to drive the assembly engine end to end.

use glam::Vec2;

use crate::physics::host::{
    rotate, BodyDef, BodyHandle, BodyState, ContactForceEvent, InteractionGroups, JointHandle,
    JointKind, PhysicsHost,
};

struct BodyRec {
    state: BodyState,
    half_extents: Vec2,
    density: f32,
    collision_groups: InteractionGroups,
    solver_groups: InteractionGroups,
}

struct JointRec {
    kind: JointKind,
    body_a: BodyHandle,
    body_b: BodyHandle,
    anchor_a: Vec2,
    #[allow(dead_code)]
    anchor_b: Vec2,
    motor: Option<(f32, f32, f32)>,
}

/// Velocity-integrating host with injectable contacts
#[derive(Default)]
pub struct KinematicHost {
    bodies: Vec<Option<BodyRec>>,
    joints: Vec<Option<JointRec>>,
    queued_contacts: Vec<ContactForceEvent>,
    emitted_contacts: Vec<ContactForceEvent>,
}

impl KinematicHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a contact-force event to be emitted by the next step
    pub fn inject_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle, magnitude: f32) {
        self.queued_contacts.push(ContactForceEvent {
            body_a,
            body_b,
            total_force_magnitude: magnitude,
        });
    }

    /// Overwrite a body's linear velocity; test/demo control surface
    pub fn set_linvel(&mut self, body: BodyHandle, linvel: Vec2) {
        if let Some(rec) = self.body_mut(body) {
            rec.state.linvel = linvel;
        }
    }

    /// Overwrite a body's angular velocity; test/demo control surface
    pub fn set_angvel(&mut self, body: BodyHandle, angvel: f32) {
        if let Some(rec) = self.body_mut(body) {
            rec.state.angvel = angvel;
        }
    }

    pub fn is_body_alive(&self, body: BodyHandle) -> bool {
        self.body_ref(body).is_some()
    }

    pub fn is_joint_alive(&self, joint: JointHandle) -> bool {
        self.joint_ref(joint).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.iter().filter(|j| j.is_some()).count()
    }

    /// Last motor write on a joint as (target, stiffness, damping)
    pub fn joint_motor(&self, joint: JointHandle) -> Option<(f32, f32, f32)> {
        self.joint_ref(joint).and_then(|j| j.motor)
    }

    /// Current parent-side anchor of a joint
    pub fn joint_anchor(&self, joint: JointHandle) -> Option<Vec2> {
        self.joint_ref(joint).map(|j| j.anchor_a)
    }

    pub fn collision_groups(&self, body: BodyHandle) -> Option<InteractionGroups> {
        self.body_ref(body).map(|b| b.collision_groups)
    }

    pub fn half_extents(&self, body: BodyHandle) -> Option<Vec2> {
        self.body_ref(body).map(|b| b.half_extents)
    }

    pub fn density(&self, body: BodyHandle) -> Option<f32> {
        self.body_ref(body).map(|b| b.density)
    }

    fn body_ref(&self, body: BodyHandle) -> Option<&BodyRec> {
        self.bodies.get(body.0 as usize).and_then(|b| b.as_ref())
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut BodyRec> {
        self.bodies.get_mut(body.0 as usize).and_then(|b| b.as_mut())
    }

    fn joint_ref(&self, joint: JointHandle) -> Option<&JointRec> {
        self.joints.get(joint.0 as usize).and_then(|j| j.as_ref())
    }
}

impl PhysicsHost for KinematicHost {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u64);
        self.bodies.push(Some(BodyRec {
            state: BodyState {
                translation: def.position,
                rotation: def.rotation,
                linvel: def.linvel,
                angvel: 0.0,
            },
            half_extents: def.half_extents,
            density: def.density,
            collision_groups: def.collision_groups,
            solver_groups: def.solver_groups,
        }));
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(slot) = self.bodies.get_mut(body.0 as usize) else {
            return;
        };
        if slot.take().is_some() {
            // Joints referencing a removed body die with it
            for joint in self.joints.iter_mut() {
                let references = joint
                    .as_ref()
                    .map(|rec| rec.body_a == body || rec.body_b == body)
                    .unwrap_or(false);
                if references {
                    *joint = None;
                }
            }
        }
    }

    fn create_joint(
        &mut self,
        kind: JointKind,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> JointHandle {
        let handle = JointHandle(self.joints.len() as u64);
        self.joints.push(Some(JointRec {
            kind,
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            motor: None,
        }));
        handle
    }

    fn remove_joint(&mut self, joint: JointHandle) {
        if let Some(slot) = self.joints.get_mut(joint.0 as usize) {
            *slot = None;
        }
    }

    fn set_joint_motor(&mut self, joint: JointHandle, target: f32, stiffness: f32, damping: f32) {
        if let Some(rec) = self.joints.get_mut(joint.0 as usize).and_then(|j| j.as_mut()) {
            rec.motor = Some((target, stiffness, damping));
        }
    }

    fn set_joint_anchor(&mut self, joint: JointHandle, parent_anchor: Vec2) {
        if let Some(rec) = self.joints.get_mut(joint.0 as usize).and_then(|j| j.as_mut()) {
            rec.anchor_a = parent_anchor;
        }
    }

    fn set_collision_groups(&mut self, body: BodyHandle, groups: InteractionGroups) {
        if let Some(rec) = self.body_mut(body) {
            rec.collision_groups = groups;
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.body_ref(body).map(|b| b.state)
    }

    fn step(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().flatten() {
            body.state.translation += body.state.linvel * dt;
            body.state.rotation += body.state.angvel * dt;
        }

        // Snap jointed children to their parent anchor, in creation order.
        // Revolute children additionally take their motor target as the
        // relative rotation, which stands in for a converged motor.
        for i in 0..self.joints.len() {
            let Some(rec) = self.joints[i].as_ref() else {
                continue;
            };
            let (kind, a, b, anchor_a, motor) =
                (rec.kind, rec.body_a, rec.body_b, rec.anchor_a, rec.motor);
            let Some(parent) = self.body_ref(a).map(|p| p.state) else {
                continue;
            };
            let Some(child) = self.body_mut(b) else {
                continue;
            };
            child.state.translation = parent.translation + rotate(anchor_a, parent.rotation);
            child.state.rotation = match kind {
                JointKind::Fixed => parent.rotation,
                JointKind::Revolute => parent.rotation + motor.map(|m| m.0).unwrap_or(0.0),
            };
        }

        self.emitted_contacts.append(&mut self.queued_contacts);
    }

    fn drain_contact_events(&mut self) -> Vec<ContactForceEvent> {
        std::mem::take(&mut self.emitted_contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_body(position: Vec2) -> BodyDef {
        BodyDef {
            position,
            rotation: 0.0,
            half_extents: Vec2::new(1.0, 1.0),
            density: 1.0,
            linvel: Vec2::ZERO,
            collision_groups: InteractionGroups::all(),
            solver_groups: InteractionGroups::all(),
        }
    }

    #[test]
    fn test_step_integrates_velocity() {
        let mut host = KinematicHost::new();
        let body = host.create_body(&simple_body(Vec2::ZERO));
        host.set_linvel(body, Vec2::new(10.0, 0.0));
        host.step(0.5);
        let state = host.body_state(body).unwrap();
        assert_eq!(state.translation, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_fixed_joint_carries_child() {
        let mut host = KinematicHost::new();
        let parent = host.create_body(&simple_body(Vec2::ZERO));
        let child = host.create_body(&simple_body(Vec2::new(2.0, 0.0)));
        host.create_joint(
            JointKind::Fixed,
            parent,
            child,
            Vec2::new(2.0, 0.0),
            Vec2::ZERO,
        );
        host.set_linvel(parent, Vec2::new(4.0, 0.0));
        host.step(1.0);
        let state = host.body_state(child).unwrap();
        assert_eq!(state.translation, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_removed_body_queries_return_none() {
        let mut host = KinematicHost::new();
        let body = host.create_body(&simple_body(Vec2::ZERO));
        host.remove_body(body);
        assert!(host.body_state(body).is_none());
        // Mutations on the dead handle are silent no-ops
        host.set_linvel(body, Vec2::new(1.0, 0.0));
        host.set_collision_groups(body, InteractionGroups::new(1, 1));
    }

    #[test]
    fn test_removing_body_kills_its_joints() {
        let mut host = KinematicHost::new();
        let parent = host.create_body(&simple_body(Vec2::ZERO));
        let child = host.create_body(&simple_body(Vec2::new(1.0, 0.0)));
        let joint = host.create_joint(JointKind::Fixed, parent, child, Vec2::ZERO, Vec2::ZERO);
        host.remove_body(child);
        assert!(!host.is_joint_alive(joint));
    }

    #[test]
    fn test_contacts_emitted_after_step() {
        let mut host = KinematicHost::new();
        let a = host.create_body(&simple_body(Vec2::ZERO));
        let b = host.create_body(&simple_body(Vec2::new(1.0, 0.0)));
        host.inject_contact(a, b, 1500.0);
        assert!(host.drain_contact_events().is_empty());
        host.step(0.016);
        let events = host.drain_contact_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].total_force_magnitude, 1500.0);
        // Drained once, gone
        assert!(host.drain_contact_events().is_empty());
    }
}
