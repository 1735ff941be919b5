//! # Physics Integration
//!
//! Semi-implicit Euler: velocities are advanced from this step's
//! accelerations first, then positions from the new velocities. Colliders
//! follow their body by the same positional delta and are re-filed in the
//! grid by the same call, so the grid never observes a stale bucket.

use glam::{Quat, Vec3};
use tracing::trace;

use crate::body::RigidBody;
use crate::error::PhysicsError;
use crate::grid::SpatialGrid;
use crate::types::{ColliderKey, EntityId};

/// Advance a body's kinematic state by `dt` and clear its accumulators.
/// Returns the positional delta. Pure in the body state: identical inputs
/// give identical outputs.
pub fn integrate_body(body: &mut RigidBody, dt: f32) -> Vec3 {
    let linear = body.acceleration + body.force_accumulator * body.inverse_mass();
    let angular =
        body.angular_acceleration + body.inverse_inertia_tensor() * body.torque_accumulator;

    body.velocity += linear * dt;
    body.angular_velocity += angular * dt;

    let delta = body.velocity * dt;
    body.position += delta;
    body.orientation = integrate_orientation(body.orientation, body.angular_velocity, dt);

    body.clear_accumulators();
    delta
}

/// `q + 0.5 * dt * (0, w) * q`, renormalised.
#[must_use]
pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity == Vec3::ZERO {
        return orientation;
    }
    let spin = Quat::from_xyzw(angular_velocity.x, angular_velocity.y, angular_velocity.z, 0.0)
        * orientation;
    let next = orientation + spin * (0.5 * dt);
    if next.length_squared() > f32::EPSILON {
        next.normalize()
    } else {
        orientation
    }
}

/// Translate every collider of `body` by `delta` and move it to its new cell
/// when needed. Returns how many colliders changed cell.
///
/// # Errors
///
/// [`PhysicsError::NotInGrid`] when a collider was never inserted.
pub fn advance_colliders(
    entity: EntityId,
    body: &mut RigidBody,
    delta: Vec3,
    grid: &mut SpatialGrid,
) -> Result<usize, PhysicsError> {
    let mut moved = 0;
    for (slot, collider) in (0u32..).zip(body.colliders.iter_mut()) {
        collider.translate(delta);
        if grid.rebucket(ColliderKey::new(entity, slot), collider)? {
            moved += 1;
        }
    }
    Ok(moved)
}

/// Full integration step for one entity. Static bodies are left untouched.
/// Returns how many colliders changed cell.
///
/// # Errors
///
/// Propagates [`advance_colliders`] failures.
pub fn integrate(
    entity: EntityId,
    body: &mut RigidBody,
    dt: f32,
    grid: &mut SpatialGrid,
) -> Result<usize, PhysicsError> {
    if body.is_static() {
        return Ok(0);
    }
    let delta = integrate_body(body, dt);
    trace!(%entity, position = ?body.position, velocity = ?body.velocity, "integrated");
    advance_colliders(entity, body, delta, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;

    fn unit_body() -> RigidBody {
        RigidBody::new_dynamic(2.0, Vec3::ZERO, Quat::IDENTITY, Mat3::IDENTITY)
    }

    #[test]
    fn force_is_scaled_by_inverse_mass() {
        let mut body = unit_body();
        body.apply_force(Vec3::new(4.0, 0.0, 0.0));
        let delta = integrate_body(&mut body, 0.5);
        // a = 2, v = 1, dx = 0.5
        assert!((body.velocity.x - 1.0).abs() < 1e-6);
        assert!((delta.x - 0.5).abs() < 1e-6);
        assert_eq!(body.force_accumulator, Vec3::ZERO);
    }

    #[test]
    fn persistent_acceleration_is_not_compounded() {
        let mut body = unit_body();
        body.acceleration = Vec3::new(0.0, -1.0, 0.0);
        integrate_body(&mut body, 1.0);
        integrate_body(&mut body, 1.0);
        assert_eq!(body.acceleration, Vec3::new(0.0, -1.0, 0.0));
        assert!((body.velocity.y + 2.0).abs() < 1e-6);
    }

    #[test]
    fn spin_about_y_rotates_about_y() {
        let q = integrate_orientation(Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0), 0.01);
        let (axis, angle) = q.to_axis_angle();
        assert!((axis - Vec3::Y).length() < 1e-4);
        assert!((angle - 0.01).abs() < 1e-4);
        assert!((q.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn static_body_is_not_integrated() {
        let mut grid = SpatialGrid::new(70.0, 5.0);
        let mut body = RigidBody::new_static(Vec3::ONE, Quat::IDENTITY);
        body.velocity = Vec3::X;
        assert_eq!(integrate(EntityId(1), &mut body, 1.0, &mut grid).unwrap(), 0);
        assert_eq!(body.position, Vec3::ONE);
    }
}
