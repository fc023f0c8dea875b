//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen pointer events plus key presses into a
//! unified `InputEvent` enum consumed by the drag and nudge handlers.

/// Which pointer button a press came from (DOM `PointerEvent.button`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button, touch contact, or pen tip.
    Primary,
    /// Middle button / wheel press.
    Auxiliary,
    /// Right button.
    Secondary,
    Other(i16),
}

impl PointerButton {
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }

    pub fn is_primary(self) -> bool {
        self == Self::Primary
    }
}

/// A normalized input event from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on a node's hit target.
    PointerDown {
        pointer_id: i32,
        button: PointerButton,
        x: f64,
        y: f64,
    },

    /// Pointer moved anywhere on the tracked surface.
    PointerMove { pointer_id: i32, x: f64, y: f64 },

    /// Pointer released.
    PointerUp { pointer_id: i32, x: f64, y: f64 },

    /// The platform cancelled the pointer (e.g. touch turned into a scroll).
    PointerCancel { pointer_id: i32 },

    /// The surface lost pointer capture without a matching release.
    LostCapture { pointer_id: i32 },

    /// Key pressed while a node had focus (`KeyboardEvent.key`).
    Key { key: String },
}

impl InputEvent {
    pub fn from_pointer_down(pointer_id: i32, button: i16, x: f64, y: f64) -> Self {
        Self::PointerDown {
            pointer_id,
            button: PointerButton::from_dom(button),
            x,
            y,
        }
    }

    pub fn from_pointer_move(pointer_id: i32, x: f64, y: f64) -> Self {
        Self::PointerMove { pointer_id, x, y }
    }

    pub fn from_pointer_up(pointer_id: i32, x: f64, y: f64) -> Self {
        Self::PointerUp { pointer_id, x, y }
    }

    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
        }
    }

    /// Extract position if this is a pointer event carrying coordinates.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    /// Pointer id for pointer events, `None` for keys.
    pub fn pointer_id(&self) -> Option<i32> {
        match self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. }
            | Self::PointerCancel { pointer_id }
            | Self::LostCapture { pointer_id } => Some(*pointer_id),
            Self::Key { .. } => None,
        }
    }
}
