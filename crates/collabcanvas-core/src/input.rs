//! Pointer event model for unified mouse/touch handling.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A single pointer or wheel event, as delivered by the host UI runtime.
///
/// All positions are in screen coordinates. Events are reduced one at a
/// time, in delivery order, by [`crate::canvas::Canvas::handle_pointer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// The host aborted the gesture (e.g. pointer capture lost). Any
    /// in-progress mutation rolls back to the last committed state.
    Cancel,
    Scroll {
        position: Point,
        delta: Vec2,
    },
}
