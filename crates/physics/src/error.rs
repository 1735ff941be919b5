use thiserror::Error;

use crate::grid::CellCoord;
use crate::types::{ColliderKey, EntityId};

/// Errors raised while turning raw point lists into colliders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColliderError {
    #[error("a collider needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),
    #[error("triangle points are collinear")]
    DegenerateTriangle,
}

/// Invariant violations that abort a physics frame.
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("entity {0} is not in this frame's body index")]
    UnknownEntity(EntityId),
    #[error("entity {0} appears more than once")]
    DuplicateEntity(EntityId),
    #[error("collider {0} does not exist")]
    UnknownCollider(ColliderKey),
    #[error("collider {0} is not filed in the grid")]
    NotInGrid(ColliderKey),
    #[error("collider {0} is already filed in the grid")]
    AlreadyInGrid(ColliderKey),
    #[error("collider {key} is filed under {filed:?} but its center maps to {expected:?}")]
    StaleBucket {
        key: ColliderKey,
        filed: CellCoord,
        expected: CellCoord,
    },
    #[error("collision pairs entity {0} with itself")]
    SelfPair(EntityId),
    #[error(transparent)]
    Collider(#[from] ColliderError),
}
