//! Input model: mouse buttons, modifier keys, keys, and the drag state machine.
//!
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up. Each intermediate pointer-move applies directly to the model.
//! A dragged bubble follows the pointer at the offset it was grabbed with, so
//! a drag clamped at an edge lines up again once the pointer comes back.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::model::BubbleId;
use crate::view::Point;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
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

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"ArrowUp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Nudge direction for arrow keys as `(dx, dy)` unit steps.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            _ => None,
        }
    }

    /// Whether this key deletes the selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    /// Whether this key clears the selection.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving a bubble across the canvas.
    DraggingBubble {
        /// Id of the bubble being dragged.
        id: BubbleId,
        /// Bubble anchor minus the pointer at grab time, in canvas pixels.
        grab_offset: Point,
    },
    /// The user is steering a tail by its tip.
    DraggingTail {
        /// Id of the bubble whose tail is being steered.
        id: BubbleId,
    },
}
