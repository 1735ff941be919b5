//! # Collider Builder
//!
//! Entry point for the asset loader: turns raw point lists into colliders and
//! provides the mass helpers used when assembling bodies from them.

use glam::{Mat3, Vec3};

use crate::collider::{Aabb, Collider};
use crate::error::ColliderError;
use crate::types::{DynamicType, EntityId};

/// Builds colliders from loaded geometry.
pub struct ColliderBuilder;

impl ColliderBuilder {
    /// Three points make a triangle; any larger cloud makes the axis-aligned
    /// box that bounds it.
    ///
    /// # Errors
    ///
    /// Fewer than three points, a non-finite coordinate, or a triangle with
    /// collinear points.
    pub fn build(
        entity: EntityId,
        dynamic_type: DynamicType,
        points: &[Vec3],
    ) -> Result<Collider, ColliderError> {
        if points.len() < 3 {
            return Err(ColliderError::TooFewPoints(points.len()));
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ColliderError::NonFinitePoint(index));
        }

        if let [a, b, c] = points {
            return Collider::new_triangle(entity, dynamic_type, [*a, *b, *c]);
        }

        let bounds = Aabb::from_points(points);
        Ok(Collider::new_box(
            entity,
            dynamic_type,
            bounds.center(),
            bounds.half_extents(),
        ))
    }
}

/// Mass of a solid box of uniform density.
#[must_use]
pub fn calculate_box_mass(half_extents: Vec3, density: f32) -> f32 {
    let volume = 8.0 * half_extents.x * half_extents.y * half_extents.z;
    volume * density
}

/// Body-space inertia tensor of a solid box.
#[must_use]
pub fn box_inertia(mass: f32, half_extents: Vec3) -> Mat3 {
    let size = half_extents * 2.0;
    let sq = size * size;
    Mat3::from_diagonal(Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0))
}

/// Inertia of a solid box fitted to a set of colliders' combined bounds.
/// Colliders with no extent yield a zero tensor.
#[must_use]
pub fn bounding_box_inertia(mass: f32, colliders: &[Collider]) -> Mat3 {
    let corners: Vec<Vec3> = colliders
        .iter()
        .flat_map(|c| [c.aabb().min, c.aabb().max])
        .collect();
    box_inertia(mass, Aabb::from_points(&corners).half_extents())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::{Shape, ShapeKind};

    #[test]
    fn three_points_make_a_triangle() {
        let collider = ColliderBuilder::build(
            EntityId(1),
            DynamicType::Static,
            &[Vec3::ZERO, Vec3::Z, Vec3::X],
        )
        .unwrap();
        assert_eq!(collider.kind(), ShapeKind::Triangle);
        assert_eq!(collider.entity, EntityId(1));
    }

    #[test]
    fn point_cloud_makes_bounding_box() {
        let points = [
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(3.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 2.0),
            Vec3::new(1.0, 0.5, 1.0),
        ];
        let collider = ColliderBuilder::build(EntityId(2), DynamicType::Dynamic, &points).unwrap();
        assert_eq!(collider.center(), Vec3::new(1.0, 1.0, 0.0));
        match collider.shape {
            Shape::Box { half_extents } => assert_eq!(half_extents, Vec3::new(2.0, 1.0, 2.0)),
            Shape::Triangle { .. } => panic!("expected a box"),
        }
    }

    #[test]
    fn rejects_short_and_non_finite_input() {
        assert_eq!(
            ColliderBuilder::build(EntityId(1), DynamicType::Static, &[Vec3::ZERO, Vec3::X])
                .unwrap_err(),
            ColliderError::TooFewPoints(2)
        );
        assert_eq!(
            ColliderBuilder::build(
                EntityId(1),
                DynamicType::Static,
                &[Vec3::ZERO, Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y],
            )
            .unwrap_err(),
            ColliderError::NonFinitePoint(2)
        );
    }

    #[test]
    fn unit_cube_inertia() {
        let inertia = box_inertia(6.0, Vec3::splat(0.5));
        assert!((inertia.x_axis.x - 1.0).abs() < 1e-6);
        assert!((inertia.y_axis.y - 1.0).abs() < 1e-6);
        assert!((inertia.z_axis.z - 1.0).abs() < 1e-6);
        assert!((calculate_box_mass(Vec3::splat(0.5), 6.0) - 6.0).abs() < 1e-6);
    }
}
