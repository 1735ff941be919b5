//! Separating-axis contact generation for convex point-set shapes.
//!
//! Serves every pair involving a triangle. Candidate axes are the face axes of
//! both shapes plus the cross products of their edge directions; the axis of
//! least penetration becomes the contact normal.

use glam::Vec3;

use super::Contact;
use crate::collider::{Collider, Shape};

/// Edge-edge axes must beat face axes by this factor to be chosen, so resting
/// face contacts do not flicker onto nearly parallel edge axes.
const EDGE_AXIS_BIAS: f32 = 1.05;

/// Squared length below which an edge cross product is treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Projection width below which a shape is flat along an axis.
const FLAT_EPSILON: f32 = 1e-5;

struct Candidate {
    axis: Vec3,
    face: bool,
}

struct Penetration {
    /// Oriented from `b` toward `a`.
    normal: Vec3,
    depth: f32,
    score: f32,
}

/// Detect collision between two convex colliders.
#[must_use]
pub fn detect_convex_collision(a: &Collider, b: &Collider) -> Vec<Contact> {
    let mut best: Option<Penetration> = None;
    let plane = plane_normal_hint(a, b);

    for candidate in candidate_axes(a, b) {
        let Some(penetration) = penetration_along(a, b, &candidate, plane) else {
            // Found a separating axis.
            return Vec::new();
        };
        if best.as_ref().map_or(true, |current| penetration.score < current.score) {
            best = Some(penetration);
        }
    }

    let Some(Penetration { normal, depth, .. }) = best else {
        return Vec::new();
    };

    vec![Contact::new(contact_point(a, b, normal, depth), normal, depth)]
}

fn candidate_axes(a: &Collider, b: &Collider) -> Vec<Candidate> {
    let mut axes: Vec<Candidate> = a
        .face_axes()
        .into_iter()
        .chain(b.face_axes())
        .map(|axis| Candidate { axis, face: true })
        .collect();

    for edge_a in a.edge_directions() {
        for edge_b in b.edge_directions() {
            let axis = edge_a.cross(edge_b);
            if axis.length_squared() > PARALLEL_EPSILON {
                axes.push(Candidate { axis: axis.normalize(), face: false });
            }
        }
    }
    axes
}

fn project(points: &[Vec3], axis: Vec3) -> (f32, f32) {
    points.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
        let d = p.dot(axis);
        (min.min(d), max.max(d))
    })
}

/// Preferred normal when two flat shapes share a plane: the second shape's
/// face normal, or the reverse of the first's.
fn plane_normal_hint(a: &Collider, b: &Collider) -> Option<Vec3> {
    match (&a.shape, &b.shape) {
        (_, Shape::Triangle { normal, .. }) => Some(*normal),
        (Shape::Triangle { normal, .. }, _) => Some(-*normal),
        _ => None,
    }
}

fn penetration_along(
    a: &Collider,
    b: &Collider,
    candidate: &Candidate,
    plane: Option<Vec3>,
) -> Option<Penetration> {
    let (min_a, max_a) = project(a.points(), candidate.axis);
    let (min_b, max_b) = project(b.points(), candidate.axis);

    // `a` pushed out along -axis, or along +axis.
    let below = max_a - min_b;
    let above = max_b - min_a;

    // Both shapes flat along the axis and lying in the same plane: touching
    // with zero depth, the in-plane axes decide overlap.
    let flat = max_a - min_a <= FLAT_EPSILON && max_b - min_b <= FLAT_EPSILON;
    if flat && below.abs() <= FLAT_EPSILON && above.abs() <= FLAT_EPSILON {
        let normal = match plane {
            Some(hint) if hint.dot(candidate.axis) < 0.0 => -candidate.axis,
            _ => candidate.axis,
        };
        return Some(Penetration { normal, depth: 0.0, score: 0.0 });
    }

    if below <= 0.0 || above <= 0.0 {
        return None;
    }

    let (normal, depth) = if above <= below {
        (candidate.axis, above)
    } else {
        (-candidate.axis, below)
    };
    let score = if candidate.face { depth } else { depth * EDGE_AXIS_BIAS };
    Some(Penetration { normal, depth, score })
}

/// Midpoint of the penetration, taken on whichever shape presents the smaller
/// deepest feature (a corner beats an edge, an edge beats a face).
fn contact_point(a: &Collider, b: &Collider, normal: Vec3, depth: f32) -> Vec3 {
    let deepest_a = a.support(-normal);
    let deepest_b = b.support(normal);
    let point = if deepest_a.extent <= deepest_b.extent {
        deepest_a.centroid + normal * (depth * 0.5)
    } else {
        deepest_b.centroid - normal * (depth * 0.5)
    };

    let low = a.aabb().min.max(b.aabb().min);
    let high = a.aabb().max.min(b.aabb().max);
    point.clamp(low.min(high), high.max(low))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DynamicType, EntityId};

    fn floor(size: f32) -> Collider {
        Collider::new_triangle(
            EntityId(1),
            DynamicType::Static,
            [
                Vec3::new(-size, 0.0, -size),
                Vec3::new(0.0, 0.0, size),
                Vec3::new(size, 0.0, -size),
            ],
        )
        .unwrap()
    }

    fn crate_box(center: Vec3) -> Collider {
        Collider::new_box(EntityId(2), DynamicType::Dynamic, center, Vec3::splat(0.5))
    }

    #[test]
    fn box_resting_on_large_triangle() {
        let contacts = detect_convex_collision(&crate_box(Vec3::new(1.0, 0.45, 0.0)), &floor(30.0));
        assert_eq!(contacts.len(), 1);
        let contact = contacts[0];
        assert!((contact.normal - Vec3::Y).length() < 1e-5);
        assert!((contact.penetration - 0.05).abs() < 1e-4);
        // Under the box, not at the triangle centroid.
        assert!((contact.point.x - 1.0).abs() < 1e-4);
        assert!(contact.point.z.abs() < 1e-4);
    }

    #[test]
    fn box_above_triangle_is_separated() {
        assert!(detect_convex_collision(&crate_box(Vec3::new(0.0, 0.6, 0.0)), &floor(30.0)).is_empty());
    }

    #[test]
    fn box_beside_small_triangle_is_separated() {
        // Overlaps the triangle's bounds but not the triangle itself.
        let contacts = detect_convex_collision(&crate_box(Vec3::new(-1.8, 0.2, 1.8)), &floor(2.0));
        assert!(contacts.is_empty());
    }

    #[test]
    fn crossing_triangles_touch() {
        let flat = floor(2.0);
        let upright = Collider::new_triangle(
            EntityId(3),
            DynamicType::Dynamic,
            [
                Vec3::new(0.0, -1.0, -0.5),
                Vec3::new(0.0, 1.0, -0.5),
                Vec3::new(0.0, 0.0, 1.0),
            ],
        )
        .unwrap();

        let contacts = detect_convex_collision(&upright, &flat);
        assert_eq!(contacts.len(), 1);
        assert!((contacts[0].normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn coplanar_separated_triangles_do_not_touch() {
        let left = floor(1.0);
        let right = Collider::new_triangle(
            EntityId(3),
            DynamicType::Dynamic,
            [
                Vec3::new(5.0, 0.0, -1.0),
                Vec3::new(6.0, 0.0, 1.0),
                Vec3::new(7.0, 0.0, -1.0),
            ],
        )
        .unwrap();
        assert!(detect_convex_collision(&right, &left).is_empty());
    }

    #[test]
    fn coplanar_nested_triangles_touch() {
        let outer = floor(2.0);
        let inner = Collider::new_triangle(
            EntityId(3),
            DynamicType::Dynamic,
            [
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, -1.0),
            ],
        )
        .unwrap();

        let contacts = detect_convex_collision(&inner, &outer);
        assert_eq!(contacts.len(), 1);
        // Along the floor's face normal, toward the resting triangle.
        assert!((contacts[0].normal - Vec3::Y).length() < 1e-5);
        assert!(contacts[0].penetration.abs() < 1e-6);
        assert!(contacts[0].point.y.abs() < 1e-6);
    }
}
