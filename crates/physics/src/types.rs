//! Identifiers and classifications shared by every stage of the physics step.

use std::fmt;

/// Identifier of the entity that owns a rigid body and its colliders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a body takes part in integration and impulse response.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DynamicType {
    /// Infinite mass. Never integrated, never pushed by the resolver.
    #[default]
    Static,
    Dynamic,
}

/// Stable handle to a collider: the owning entity plus the collider's slot
/// in that entity's body.
///
/// The derived ordering (entity first, then slot) is the canonical pair
/// ordering used by the broad phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderKey {
    pub entity: EntityId,
    pub slot: u32,
}

impl ColliderKey {
    #[must_use]
    pub const fn new(entity: EntityId, slot: u32) -> Self {
        Self { entity, slot }
    }
}

impl fmt::Display for ColliderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.slot)
    }
}
