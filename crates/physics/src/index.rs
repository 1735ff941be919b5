//! Per-frame lookup from entity id to the entity's physics state.
//!
//! Rebuilt at the start of every step so the id-to-slot map can never go
//! stale between frames.

use std::collections::HashMap;

use crate::body::RigidBody;
use crate::collider::Collider;
use crate::entity::Entity;
use crate::error::PhysicsError;
use crate::grid::ColliderSource;
use crate::transform::Transform;
use crate::types::{ColliderKey, EntityId};

pub struct BodyIndex<'a> {
    entities: &'a mut [Entity],
    by_id: HashMap<EntityId, usize>,
}

impl<'a> BodyIndex<'a> {
    /// Index every entity that carries both a body and a transform.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::DuplicateEntity`] when two eligible entities share an id.
    pub fn build(entities: &'a mut [Entity]) -> Result<Self, PhysicsError> {
        let mut by_id = HashMap::with_capacity(entities.len());
        for (slot, entity) in entities.iter().enumerate() {
            if !entity.is_eligible() {
                continue;
            }
            if by_id.insert(entity.id, slot).is_some() {
                return Err(PhysicsError::DuplicateEntity(entity.id));
            }
        }
        Ok(Self { entities, by_id })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.by_id.contains_key(&entity)
    }

    fn slot(&self, entity: EntityId) -> Result<usize, PhysicsError> {
        self.by_id
            .get(&entity)
            .copied()
            .ok_or(PhysicsError::UnknownEntity(entity))
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] when the id is not indexed this frame.
    pub fn body(&self, entity: EntityId) -> Result<&RigidBody, PhysicsError> {
        let slot = self.slot(entity)?;
        self.entities[slot]
            .physics
            .as_ref()
            .ok_or(PhysicsError::UnknownEntity(entity))
    }

    /// # Errors
    ///
    /// [`PhysicsError::UnknownEntity`] when the id is not indexed this frame.
    pub fn body_mut(&mut self, entity: EntityId) -> Result<&mut RigidBody, PhysicsError> {
        let slot = self.slot(entity)?;
        self.entities[slot]
            .physics
            .as_mut()
            .ok_or(PhysicsError::UnknownEntity(entity))
    }

    /// Indexed entities with their body, in slice order.
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> {
        self.entities
            .iter()
            .filter(|entity| entity.is_eligible())
            .filter_map(|entity| entity.physics.as_ref().map(|body| (entity.id, body)))
    }

    /// Indexed entities with their body and transform, in slice order.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut RigidBody, &mut Transform)> {
        self.entities.iter_mut().filter_map(|entity| {
            let id = entity.id;
            entity
                .physics_and_transform_mut()
                .map(|(body, transform)| (id, body, transform))
        })
    }

    /// Every collider of every indexed body.
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.entities
            .iter()
            .filter(|entity| entity.is_eligible())
            .filter_map(|entity| entity.physics.as_ref())
            .flat_map(|body| body.colliders.iter())
    }
}

impl ColliderSource for BodyIndex<'_> {
    fn collider(&self, key: ColliderKey) -> Result<&Collider, PhysicsError> {
        let body = self.body(key.entity)?;
        usize::try_from(key.slot)
            .ok()
            .and_then(|slot| body.colliders.get(slot))
            .ok_or(PhysicsError::UnknownCollider(key))
    }

    fn inverse_mass(&self, entity: EntityId) -> Result<f32, PhysicsError> {
        Ok(self.body(entity)?.inverse_mass())
    }
}
