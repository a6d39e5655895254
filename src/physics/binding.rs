//! Joint attachment state for fillers
//!
//! The source material used a reserved invalid handle to mark torn-off
//! parts. Here that is a proper two-state type so the no-op-on-detached
//! contract is visible at every call site.

use crate::physics::host::JointHandle;

/// Whether a filler is still welded to its slot's parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointBinding {
    /// Live joint to the parent body
    Attached(JointHandle),
    /// Torn off; the joint was removed and must never be touched again
    Detached,
}

impl JointBinding {
    pub fn is_attached(&self) -> bool {
        matches!(self, JointBinding::Attached(_))
    }

    /// The live handle, if any
    pub fn handle(&self) -> Option<JointHandle> {
        match self {
            JointBinding::Attached(h) => Some(*h),
            JointBinding::Detached => None,
        }
    }

    /// Tear the binding down, returning the handle exactly once
    ///
    /// The second and every later call returns `None`, which is what makes
    /// tear-off idempotent.
    pub fn take(&mut self) -> Option<JointHandle> {
        match std::mem::replace(self, JointBinding::Detached) {
            JointBinding::Attached(h) => Some(h),
            JointBinding::Detached => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_yields_handle_once() {
        let mut binding = JointBinding::Attached(JointHandle(7));
        assert_eq!(binding.take(), Some(JointHandle(7)));
        assert_eq!(binding.take(), None);
        assert_eq!(binding, JointBinding::Detached);
    }

    #[test]
    fn test_detached_has_no_handle() {
        assert_eq!(JointBinding::Detached.handle(), None);
        assert!(!JointBinding::Detached.is_attached());
    }
}
