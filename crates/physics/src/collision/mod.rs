//! # Collision Detection
//!
//! Contact generation for candidate pairs handed over by the broad phase.
//! Detection is dispatched on the pair of shape kinds through
//! [`NarrowPhase`]; every detector reports contacts whose normal points from
//! the second collider toward the first.

mod box_box;
mod dispatcher;
mod sat;

pub use box_box::detect_box_box_collision;
pub use dispatcher::{ContactDetector, NarrowPhase};
pub use sat::detect_convex_collision;

use glam::Vec3;

use crate::types::{ColliderKey, EntityId};

/// Contact information for collision response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit contact normal, from the second body toward the first
    pub normal: Vec3,
    /// Overlap along the normal
    pub penetration: f32,
}

impl Contact {
    #[must_use]
    pub const fn new(point: Vec3, normal: Vec3, penetration: f32) -> Self {
        Self { point, normal, penetration }
    }

    /// The same contact seen from the other side of the pair.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self { normal: -self.normal, ..self }
    }
}

/// One overlapping collider pair and its contacts for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub first: EntityId,
    pub first_collider: ColliderKey,
    pub second: EntityId,
    pub second_collider: ColliderKey,
    /// Resolved in order; later contacts see earlier impulses.
    pub contacts: Vec<Contact>,
}
