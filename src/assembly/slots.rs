//! Slot creation and parent child-lists
//!
//! Slots are declared geometry: an anchor, a footprint, and a part kind,
//! attached to a chassis, turret, or track. Declaring a slot creates no
//! physics; `fill_slot` does that later, which is what allows slot-based
//! regeneration without re-deriving anchor geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assembly::world::{AssemblyWorld, SlotParent};
use crate::core::types::{PartKind, SlotId};

/// Fixed-capacity list of slot children under one parent body
///
/// Layouts are fixed at design time; overflowing a parent is a layout bug
/// and panics immediately instead of silently dropping a slot.
#[derive(Debug, Clone)]
pub struct ChildList {
    items: Vec<SlotId>,
    capacity: usize,
}

impl ChildList {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a child slot; panics when the parent is already full
    pub fn push(&mut self, slot: SlotId) {
        assert!(
            self.items.len() < self.capacity,
            "slot layout overflow: parent already holds {} children",
            self.capacity
        );
        self.items.push(slot);
    }

    pub fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Declarative slot geometry: anchor, footprint, part kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: PartKind,
}

impl SlotSpec {
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.w * 0.5, self.h * 0.5)
    }
}

/// Bulk-create empty slots under a parent from a declarative layout list
///
/// Returns the ids in layout order. Panics if the parent's child list
/// would overflow.
pub fn create_slot_entities(
    world: &mut AssemblyWorld,
    parent: SlotParent,
    layout: &[SlotSpec],
) -> Vec<SlotId> {
    let mut created = Vec::with_capacity(layout.len());
    for spec in layout {
        let slot = world.slots.spawn(parent, spec);
        world.child_list_mut(parent).push(slot);
        created.push(slot);
    }
    created
}
