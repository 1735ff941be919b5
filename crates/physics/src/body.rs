//! Per-entity rigid body state.

use glam::{Mat3, Quat, Vec3};

use crate::collider::Collider;
use crate::types::DynamicType;

/// Mass properties, kinematic state, force accumulators and owned colliders
/// of one body.
///
/// A static body always carries zero inverse mass and a zero inverse inertia
/// tensor; the constructors and [`RigidBody::add_collider`] keep that and the
/// colliders' dynamic type in sync.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Constant linear acceleration applied every step (not reset).
    pub acceleration: Vec3,
    /// Constant angular acceleration applied every step (not reset).
    pub angular_acceleration: Vec3,
    pub force_accumulator: Vec3,
    pub torque_accumulator: Vec3,
    inverse_mass: f32,
    /// World space.
    inverse_inertia_tensor: Mat3,
    dynamic_type: DynamicType,
    pub colliders: Vec<Collider>,
}

impl RigidBody {
    /// A movable body. A non-positive or non-finite mass yields an immovable
    /// body that still integrates its velocity; a singular inertia tensor
    /// yields a body that never rotates.
    #[must_use]
    pub fn new_dynamic(mass: f32, position: Vec3, orientation: Quat, inertia: Mat3) -> Self {
        let inverse_mass = if mass.is_finite() && mass > 0.0 { mass.recip() } else { 0.0 };
        let inverse_inertia_tensor = if inertia.determinant().abs() > f32::EPSILON {
            inertia.inverse()
        } else {
            Mat3::ZERO
        };
        Self {
            inverse_mass,
            inverse_inertia_tensor,
            dynamic_type: DynamicType::Dynamic,
            ..Self::new_static(position, orientation)
        }
    }

    /// An immovable body with infinite mass.
    #[must_use]
    pub fn new_static(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            angular_acceleration: Vec3::ZERO,
            force_accumulator: Vec3::ZERO,
            torque_accumulator: Vec3::ZERO,
            inverse_mass: 0.0,
            inverse_inertia_tensor: Mat3::ZERO,
            dynamic_type: DynamicType::Static,
            colliders: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    /// Attach a collider. Its dynamic type is overwritten to mirror the body.
    pub fn add_collider(&mut self, mut collider: Collider) {
        collider.dynamic_type = self.dynamic_type;
        self.colliders.push(collider);
    }

    #[must_use]
    pub const fn dynamic_type(&self) -> DynamicType {
        self.dynamic_type
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.dynamic_type == DynamicType::Static
    }

    #[must_use]
    pub const fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// `None` for infinite mass.
    #[must_use]
    pub fn mass(&self) -> Option<f32> {
        (self.inverse_mass > 0.0).then_some(self.inverse_mass.recip())
    }

    #[must_use]
    pub const fn inverse_inertia_tensor(&self) -> Mat3 {
        self.inverse_inertia_tensor
    }

    /// Accumulate a force through the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force_accumulator += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque_accumulator += torque;
    }

    /// Accumulate a force applied at a world-space point, producing torque
    /// about the body position.
    pub fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force_accumulator += force;
        self.torque_accumulator += (point - self.position).cross(force);
    }

    /// Velocity of a world-space point rigidly attached to the body.
    #[must_use]
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(point - self.position)
    }

    pub fn clear_accumulators(&mut self) {
        self.force_accumulator = Vec3::ZERO;
        self.torque_accumulator = Vec3::ZERO;
    }
}
