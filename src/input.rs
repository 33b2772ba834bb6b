//! Input model: mouse buttons, modifier keys, and the gesture state machine.
//!
//! `InteractionState` is the gesture being tracked between pointer-down and
//! pointer-up. It is owned by the engine and never stored on an object; each
//! variant carries what the next pointer-move needs to compute its update.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::ObjectId;

/// Modifier keys held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held. Snaps rotation while rotating.
    pub shift: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Gesture in progress for the engine's single pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Pressed on an object body; still below the drag threshold, so this may
    /// turn out to be a click.
    ArmedForDrag {
        id: ObjectId,
        /// Screen-space position of the pointer-down.
        down_screen: Point,
        /// Object x when the press started.
        start_x: f64,
        /// Object y when the press started.
        start_y: f64,
    },
    /// Moving an object; position follows the screen delta divided by scale.
    Dragging {
        id: ObjectId,
        down_screen: Point,
        start_x: f64,
        start_y: f64,
    },
    /// Pressed on a rotate corner; no move has arrived yet.
    ArmedForRotate {
        id: ObjectId,
        /// Pointer angle around the object's screen-space center at press time, in radians.
        start_angle: f64,
        /// Object rotation in degrees when the press started.
        start_rotation: f64,
    },
    /// Rotating an object around its center.
    Rotating {
        id: ObjectId,
        start_angle: f64,
        start_rotation: f64,
    },
}

impl InteractionState {
    /// Id of the object the current gesture targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<&ObjectId> {
        match self {
            Self::Idle => None,
            Self::ArmedForDrag { id, .. }
            | Self::Dragging { id, .. }
            | Self::ArmedForRotate { id, .. }
            | Self::Rotating { id, .. } => Some(id),
        }
    }

    /// Whether a drag or rotate is actively mutating geometry.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dragging { .. } | Self::Rotating { .. })
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
