//! Physics collaborator boundary: host trait, handles, joint bindings,
//! and the deterministic kinematic host used by tests and the demo.

pub mod binding;
pub mod host;
pub mod kinematic;

pub use binding::JointBinding;
pub use host::{
    rotate, BodyDef, BodyHandle, BodyState, ContactForceEvent, InteractionGroups, JointHandle,
    JointKind, PhysicsHost,
};
pub use kinematic::KinematicHost;
