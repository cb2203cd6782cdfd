//! Input event types fed into the interaction engine.
//!
//! All positions are screen coordinates in pixels.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Platform command modifier (Ctrl, or Cmd on macOS).
    pub const COMMAND: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl or Meta held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
        /// Milliseconds since an open text entry appeared. Without it a
        /// press while editing always ends the entry.
        #[serde(default)]
        after_ms: Option<u64>,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
    },
    /// Vertical wheel motion; positive `delta_y` scrolls down.
    Wheel {
        position: Point,
        delta_y: f64,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyEvent {
    Pressed {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Released {
        key: String,
    },
}

/// Events from the inline text-entry surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextEntryEvent {
    /// The input's value changed.
    Input { value: String },
    /// Enter pressed.
    Submit,
    /// Escape pressed.
    Cancel,
    /// Focus left the input `after_ms` after it opened; `None` means now.
    Blur {
        #[serde(default)]
        after_ms: Option<u64>,
    },
}

/// Any event the engine consumes; the unit of a recorded event script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "event", rename_all = "snake_case")]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyEvent),
    Text(TextEntryEvent),
    /// Resize of the drawing surface.
    Resize { width: f64, height: f64 },
}

impl InputEvent {
    pub fn down(x: f64, y: f64) -> Self {
        InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            after_ms: None,
        })
    }

    /// Left press `after_ms` after the open text entry appeared.
    pub fn down_after(x: f64, y: f64, after_ms: u64) -> Self {
        InputEvent::Pointer(PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            after_ms: Some(after_ms),
        })
    }

    pub fn moved(x: f64, y: f64) -> Self {
        InputEvent::Pointer(PointerEvent::Move {
            position: Point::new(x, y),
        })
    }

    pub fn up(x: f64, y: f64) -> Self {
        InputEvent::Pointer(PointerEvent::Up {
            position: Point::new(x, y),
        })
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        InputEvent::Key(KeyEvent::Pressed {
            key: key.into(),
            modifiers,
        })
    }
}
