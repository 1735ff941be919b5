//! Collision detection dispatcher that routes to appropriate algorithms

use std::collections::HashMap;

use tracing::trace;

use super::{detect_box_box_collision, detect_convex_collision, Contact};
use crate::collider::{Collider, ShapeKind};
use crate::types::DynamicType;

/// Function type for contact generation between two colliders.
///
/// Returned normals point from `b` toward `a`. An empty vector means no overlap.
pub type ContactDetector = fn(&Collider, &Collider) -> Vec<Contact>;

#[derive(Clone, Copy)]
struct Entry {
    detector: ContactDetector,
    /// The detector was registered for the reversed pair.
    swapped: bool,
}

/// Narrow-phase strategy table keyed by the pair of shape kinds.
pub struct NarrowPhase {
    detectors: HashMap<(ShapeKind, ShapeKind), Entry>,
}

impl NarrowPhase {
    /// Create a new dispatcher with all detection algorithms registered
    #[must_use]
    pub fn new() -> Self {
        let mut dispatcher = Self { detectors: HashMap::new() };

        dispatcher.register(ShapeKind::Box, ShapeKind::Box, detect_box_box_collision);
        dispatcher.register(ShapeKind::Box, ShapeKind::Triangle, detect_convex_collision);
        dispatcher.register(ShapeKind::Triangle, ShapeKind::Triangle, detect_convex_collision);

        dispatcher
    }

    /// Register a detector for a pair of shape kinds. The reversed pair is
    /// served by the same detector with its arguments and normals swapped.
    pub fn register(&mut self, kind_a: ShapeKind, kind_b: ShapeKind, detector: ContactDetector) {
        self.detectors.insert((kind_a, kind_b), Entry { detector, swapped: false });
        if kind_a != kind_b {
            self.detectors.insert((kind_b, kind_a), Entry { detector, swapped: true });
        }
    }

    /// Contacts between two colliders, or `None` when they do not touch.
    ///
    /// Two static colliders never produce contacts.
    #[must_use]
    pub fn detect(&self, first: &Collider, second: &Collider) -> Option<Vec<Contact>> {
        if first.dynamic_type == DynamicType::Static && second.dynamic_type == DynamicType::Static {
            return None;
        }

        let Some(entry) = self.detectors.get(&(first.kind(), second.kind())) else {
            trace!(first = ?first.kind(), second = ?second.kind(), "no detector registered");
            return None;
        };

        let contacts = if entry.swapped {
            (entry.detector)(second, first).into_iter().map(Contact::flipped).collect()
        } else {
            (entry.detector)(first, second)
        };

        (!contacts.is_empty()).then_some(contacts)
    }
}

impl Default for NarrowPhase {
    fn default() -> Self {
        Self::new()
    }
}
