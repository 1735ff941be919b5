//! Minimal entity view consumed by the physics system.
//!
//! Stands in for the engine's entity/component store: an entity takes part in
//! physics only when it carries both a rigid body and a transform.

use crate::body::RigidBody;
use crate::transform::Transform;
use crate::types::EntityId;

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub physics: Option<RigidBody>,
    pub transform: Option<Transform>,
}

impl Entity {
    #[must_use]
    pub const fn new(id: EntityId) -> Self {
        Self { id, physics: None, transform: None }
    }

    /// Entity with a body and a transform placed at the body's pose.
    #[must_use]
    pub fn with_body(id: EntityId, body: RigidBody) -> Self {
        let transform = Transform::new(body.position, body.orientation);
        Self { id, physics: Some(body), transform: Some(transform) }
    }

    /// Whether the physics system processes this entity.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.physics.is_some() && self.transform.is_some()
    }

    /// Both capabilities at once, if present.
    pub fn physics_and_transform_mut(&mut self) -> Option<(&mut RigidBody, &mut Transform)> {
        match (&mut self.physics, &mut self.transform) {
            (Some(body), Some(transform)) => Some((body, transform)),
            _ => None,
        }
    }
}
