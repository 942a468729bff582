use serde::{Deserialize, Serialize};

use crate::core::PixelRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    Move,
    Down(MouseButton),
}

/// Pointer activity in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
}

impl MouseEvent {
    #[must_use]
    pub const fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: MouseEventKind::Move,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn pressed(button: MouseButton, x: i32, y: i32) -> Self {
        Self {
            kind: MouseEventKind::Down(button),
            x,
            y,
        }
    }
}

/// Latest pointer event of one window.
///
/// Event sources write into it while polling; widgets read and reset it
/// between polls. Only events strictly inside the capture bounds are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseState {
    bounds: PixelRect,
    pending: Option<MouseEvent>,
}

impl Default for MouseState {
    fn default() -> Self {
        Self {
            bounds: PixelRect::new(0, 0, 0, 0),
            pending: None,
        }
    }
}

impl MouseState {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let mut state = Self::default();
        state.reset(width, height);
        state
    }

    /// Captures the whole `width x height` window and drops the pending event.
    pub fn reset(&mut self, width: i32, height: i32) {
        self.bounds = PixelRect::new(0, 0, width, height);
        self.pending = None;
    }

    #[must_use]
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn on_event(&mut self, event: MouseEvent) {
        if self.bounds.contains_strict(event.x, event.y) {
            self.pending = Some(event);
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<MouseEvent> {
        self.pending
    }

    /// Position of a pending move event.
    #[must_use]
    pub fn move_position(&self) -> Option<(i32, i32)> {
        self.pending
            .filter(|event| event.kind == MouseEventKind::Move)
            .filter(|event| event.x > 0 && event.y > 0)
            .map(|event| (event.x, event.y))
    }

    /// Position of a pending press of `button`.
    #[must_use]
    pub fn click_position(&self, button: MouseButton) -> Option<(i32, i32)> {
        self.pending
            .filter(|event| event.kind == MouseEventKind::Down(button))
            .filter(|event| event.x > 0 && event.y > 0)
            .map(|event| (event.x, event.y))
    }
}
