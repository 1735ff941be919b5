//! Intent messages addressed to the physics step.

use glam::Vec3;

use crate::types::EntityId;

/// Directional move request. At most one direction takes effect, in the order
/// forward, backward, left, right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Unit planar direction of the winning flag, or `None` when no flag is set.
    #[must_use]
    pub fn direction(self) -> Option<Vec3> {
        if self.forward {
            Some(Vec3::NEG_Z)
        } else if self.backward {
            Some(Vec3::Z)
        } else if self.left {
            Some(Vec3::NEG_X)
        } else if self.right {
            Some(Vec3::X)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessagePayload {
    Move(MoveIntent),
    /// Pointer motion; consumed without physics effect.
    MouseMove { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    /// Entity the message concerns.
    pub sender: EntityId,
    pub payload: MessagePayload,
}

impl Message {
    #[must_use]
    pub const fn movement(sender: EntityId, intent: MoveIntent) -> Self {
        Self { sender, payload: MessagePayload::Move(intent) }
    }
}
