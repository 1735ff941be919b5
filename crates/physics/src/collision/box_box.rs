//! Box-box contact generation for world-axis-aligned boxes.

use glam::Vec3;

use super::Contact;
use crate::collider::{Collider, Shape};

/// Detect collision between two boxes
///
/// Uses the axis of least overlap as the contact normal and the center of the
/// intersection region as the contact point.
#[must_use]
pub fn detect_box_box_collision(a: &Collider, b: &Collider) -> Vec<Contact> {
    let (Shape::Box { half_extents: half_a }, Shape::Box { half_extents: half_b }) =
        (&a.shape, &b.shape)
    else {
        return Vec::new();
    };

    // Calculate separation on each axis
    let center_diff = a.center() - b.center();
    let overlap = *half_a + *half_b - center_diff.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return Vec::new();
    }

    // Find axis with smallest overlap (separation axis)
    let min_overlap = overlap.min_element();
    let normal = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        Vec3::new(sign(center_diff.x), 0.0, 0.0)
    } else if overlap.y <= overlap.z {
        Vec3::new(0.0, sign(center_diff.y), 0.0)
    } else {
        Vec3::new(0.0, 0.0, sign(center_diff.z))
    };

    let low = a.aabb().min.max(b.aabb().min);
    let high = a.aabb().max.min(b.aabb().max);

    vec![Contact::new((low + high) * 0.5, normal, min_overlap)]
}

fn sign(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}
