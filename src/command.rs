//! Commands issued against the selected object by toolbars and key listeners.
//!
//! UI surfaces that are not the canvas itself never reach into engine state.
//! They send a [`Command`] to [`crate::engine::EngineCore::apply_command`],
//! which resolves the current selection and performs the edit.

use serde::{Deserialize, Serialize};

use crate::layering::Direction;

/// An edit applied to the currently selected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Set width and height, keeping the center fixed. Clamped to the minimum size.
    Resize { width: f64, height: f64 },
    /// Set width and derive height from the object's aspect ratio.
    ResizeKeepingAspect { width: f64 },
    /// Remove the object.
    Delete,
    /// Move one overlap-relative step in the stack.
    Reorder { direction: Direction },
    /// Merge keys into the object's payload (null values delete keys).
    SetContent { props: serde_json::Value },
}
