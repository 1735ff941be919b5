//! Debug overlay geometry for the renderer.
//!
//! Purely observational: reads colliders and collisions, never writes back.

use glam::Vec3;

use crate::collider::Collider;
use crate::collision::Collision;
use crate::types::DynamicType;

pub const STATIC_COLOR: [f32; 3] = [0.5, 0.5, 0.5];
pub const DYNAMIC_COLOR: [f32; 3] = [0.2, 0.9, 0.3];
pub const CONTACT_COLOR: [f32; 3] = [1.0, 0.2, 0.2];
pub const NORMAL_COLOR: [f32; 3] = [1.0, 0.9, 0.1];

/// Drawn length of a contact normal.
const NORMAL_LENGTH: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl DebugVertex {
    #[must_use]
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self { position: position.to_array(), color }
    }
}

/// Sink for overlay primitives.
pub trait DebugDraw {
    fn line(&mut self, from: Vec3, to: Vec3, color: [f32; 3]);
    fn point(&mut self, at: Vec3, color: [f32; 3]);
}

/// Emit collider edges, contact points and contact normals into `sink`.
pub fn draw<'c, D>(
    sink: &mut D,
    colliders: impl IntoIterator<Item = &'c Collider>,
    collisions: &[Collision],
) where
    D: DebugDraw + ?Sized,
{
    for collider in colliders {
        let color = match collider.dynamic_type {
            DynamicType::Static => STATIC_COLOR,
            DynamicType::Dynamic => DYNAMIC_COLOR,
        };
        let points = collider.points();
        for &(a, b) in collider.edges() {
            sink.line(points[a], points[b], color);
        }
    }
    for contact in collisions.iter().flat_map(|c| &c.contacts) {
        sink.point(contact.point, CONTACT_COLOR);
        sink.line(contact.point, contact.point + contact.normal * NORMAL_LENGTH, NORMAL_COLOR);
    }
}

/// Line-list and point-list vertex buffers for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugFrame {
    /// Pairs of vertices, one pair per segment.
    pub lines: Vec<DebugVertex>,
    pub points: Vec<DebugVertex>,
}

impl DebugFrame {
    #[must_use]
    pub fn capture<'c>(
        colliders: impl IntoIterator<Item = &'c Collider>,
        collisions: &[Collision],
    ) -> Self {
        let mut frame = Self::default();
        draw(&mut frame, colliders, collisions);
        frame
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len() / 2
    }

    #[must_use]
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    #[must_use]
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }
}

impl DebugDraw for DebugFrame {
    fn line(&mut self, from: Vec3, to: Vec3, color: [f32; 3]) {
        self.lines.push(DebugVertex::new(from, color));
        self.lines.push(DebugVertex::new(to, color));
    }

    fn point(&mut self, at: Vec3, color: [f32; 3]) {
        self.points.push(DebugVertex::new(at, color));
    }
}
