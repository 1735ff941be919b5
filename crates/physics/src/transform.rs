//! Transform capability mirrored from physics state for the renderer.

use glam::{Mat4, Quat, Vec3};

/// Position, orientation and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation, ..Self::default() }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Compose an extra rotation and renormalise.
    pub fn rotate(&mut self, rotation: Quat) {
        self.orientation = (self.orientation * rotation).normalize();
    }

    /// Scale, then rotate, then translate.
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }

    /// Column-major array form of [`Transform::world_matrix`] for GPU upload.
    #[must_use]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.world_matrix().to_cols_array_2d()
    }
}
