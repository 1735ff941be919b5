//! Collider shapes and their cached world-space data.
//!
//! A [`Collider`] is a tagged [`Shape`] placed at a world-space center. Every
//! collider keeps a point list, an edge list and an axis-aligned bounding box
//! in sync with its geometry; these feed the broad phase, the narrow phase and
//! the debug overlay. Geometry only changes through [`Collider::translate`],
//! which is the single place derived data is recomputed.

use glam::Vec3;

use crate::error::ColliderError;
use crate::grid::CellCoord;
use crate::types::{DynamicType, EntityId};

/// Shape kinds used to key narrow-phase strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Triangle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// World-axis-aligned box.
    Box { half_extents: Vec3 },
    /// Triangle with vertices stored relative to the collider center.
    Triangle { offsets: [Vec3; 3], normal: Vec3 },
}

impl Shape {
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Triangle { .. } => ShapeKind::Triangle,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set. An empty set yields a degenerate box at the origin.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self { min: Vec3::ZERO, max: Vec3::ZERO };
        };
        points.iter().skip(1).fold(
            Self { min: *first, max: *first },
            |acc, p| Self { min: acc.min.min(*p), max: acc.max.max(*p) },
        )
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Closed-interval overlap test; touching boxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    #[must_use]
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// The points of a shape that lie furthest along a direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportFeature {
    /// Mean of the tied points: a vertex, an edge midpoint or a face center.
    pub centroid: Vec3,
    /// Diagonal length of the tied points' bounds; zero for a single vertex.
    pub extent: f32,
}

#[derive(Debug, Clone)]
pub struct Collider {
    pub shape: Shape,
    /// Owning entity; stamped when the body is registered with the physics system.
    pub entity: EntityId,
    /// Mirrors the owning body.
    pub dynamic_type: DynamicType,
    center: Vec3,
    pub(crate) cell: Option<CellCoord>,
    points: Vec<Vec3>,
    edges: Vec<(usize, usize)>,
    aabb: Aabb,
}

impl Collider {
    /// Axis-aligned box around `center`.
    #[must_use]
    pub fn new_box(
        entity: EntityId,
        dynamic_type: DynamicType,
        center: Vec3,
        half_extents: Vec3,
    ) -> Self {
        Self::with_shape(
            entity,
            dynamic_type,
            center,
            Shape::Box { half_extents: half_extents.abs() },
        )
    }

    /// Triangle from world-space vertices; the center is the centroid and the
    /// normal follows the winding `(b - a) x (c - a)`.
    ///
    /// # Errors
    ///
    /// [`ColliderError::NonFinitePoint`] or [`ColliderError::DegenerateTriangle`].
    pub fn new_triangle(
        entity: EntityId,
        dynamic_type: DynamicType,
        vertices: [Vec3; 3],
    ) -> Result<Self, ColliderError> {
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(ColliderError::NonFinitePoint(index));
        }
        let [a, b, c] = vertices;
        let normal = (b - a).cross(c - a);
        if normal.length_squared() <= f32::EPSILON * (b - a).length_squared().max(1.0) {
            return Err(ColliderError::DegenerateTriangle);
        }
        let center = (a + b + c) / 3.0;
        Ok(Self::with_shape(
            entity,
            dynamic_type,
            center,
            Shape::Triangle {
                offsets: [a - center, b - center, c - center],
                normal: normal.normalize(),
            },
        ))
    }

    fn with_shape(entity: EntityId, dynamic_type: DynamicType, center: Vec3, shape: Shape) -> Self {
        let mut collider = Self {
            shape,
            entity,
            dynamic_type,
            center,
            cell: None,
            points: Vec::new(),
            edges: Vec::new(),
            aabb: Aabb { min: center, max: center },
        };
        collider.compute_derived_data();
        collider
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// World-space center.
    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Grid bucket this collider is currently filed under, if any.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    /// World-space vertices.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Index pairs into [`Collider::points`].
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    #[must_use]
    pub const fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Move the collider and refresh its derived data. The caller owns grid
    /// consistency; see [`crate::grid::SpatialGrid::rebucket`].
    pub fn translate(&mut self, delta: Vec3) {
        self.center += delta;
        self.compute_derived_data();
    }

    /// Outward face normals used as separating-axis candidates.
    #[must_use]
    pub fn face_axes(&self) -> Vec<Vec3> {
        match &self.shape {
            Shape::Box { .. } => vec![Vec3::X, Vec3::Y, Vec3::Z],
            Shape::Triangle { offsets, normal } => {
                // In-plane edge normals separate coplanar triangles.
                let mut axes = vec![*normal];
                for i in 0..3 {
                    let edge = offsets[(i + 1) % 3] - offsets[i];
                    let axis = normal.cross(edge);
                    if axis.length_squared() > f32::EPSILON {
                        axes.push(axis.normalize());
                    }
                }
                axes
            }
        }
    }

    /// Edge directions crossed pairwise to form edge-edge axes.
    #[must_use]
    pub fn edge_directions(&self) -> Vec<Vec3> {
        match &self.shape {
            Shape::Box { .. } => vec![Vec3::X, Vec3::Y, Vec3::Z],
            Shape::Triangle { offsets, .. } => (0..3)
                .map(|i| (offsets[(i + 1) % 3] - offsets[i]).normalize_or_zero())
                .collect(),
        }
    }

    /// Centroid and size of the feature furthest along `direction`.
    #[must_use]
    pub fn support(&self, direction: Vec3) -> SupportFeature {
        let best = self
            .points
            .iter()
            .map(|p| p.dot(direction))
            .fold(f32::NEG_INFINITY, f32::max);
        let tolerance = 1e-4 * (1.0 + self.aabb.half_extents().length());
        let tied: Vec<Vec3> = self
            .points
            .iter()
            .copied()
            .filter(|p| p.dot(direction) >= best - tolerance)
            .collect();
        let bounds = Aabb::from_points(&tied);
        #[allow(clippy::cast_precision_loss)]
        let centroid = tied.iter().copied().sum::<Vec3>() / tied.len().max(1) as f32;
        SupportFeature {
            centroid,
            extent: (bounds.max - bounds.min).length(),
        }
    }

    fn compute_derived_data(&mut self) {
        match &self.shape {
            Shape::Box { half_extents } => {
                self.points = (0..8)
                    .map(|i| {
                        let sign = Vec3::new(
                            if i & 1 == 0 { -1.0 } else { 1.0 },
                            if i & 2 == 0 { -1.0 } else { 1.0 },
                            if i & 4 == 0 { -1.0 } else { 1.0 },
                        );
                        self.center + *half_extents * sign
                    })
                    .collect();
                // Corners joined by an edge differ in exactly one sign bit.
                self.edges = (0..8usize)
                    .flat_map(|i| {
                        [1usize, 2, 4]
                            .into_iter()
                            .filter(move |bit| i & bit == 0)
                            .map(move |bit| (i, i | bit))
                    })
                    .collect();
            }
            Shape::Triangle { offsets, .. } => {
                self.points = offsets.iter().map(|o| self.center + *o).collect();
                self.edges = vec![(0, 1), (1, 2), (2, 0)];
            }
        }
        self.aabb = Aabb::from_points(&self.points);
    }
}
