//! Pointer tracking.
//!
//! The field only cares about one piece of input: where the pointer is, or
//! that it isn't over the surface at all. [`PointerState`] makes the second
//! case an explicit variant instead of sentinel coordinates.
//!
//! Raw last-known-value semantics: no smoothing, no debouncing.

use glam::Vec2;
use winit::event::WindowEvent;

/// Latest known pointer position over the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    /// The pointer is not over the surface.
    #[default]
    Absent,
    /// The pointer is at these surface pixel coordinates.
    Present(Vec2),
}

impl PointerState {
    pub fn position(&self) -> Option<Vec2> {
        match self {
            PointerState::Absent => None,
            PointerState::Present(pos) => Some(*pos),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, PointerState::Present(_))
    }
}

/// Owner of the shared [`PointerState`].
///
/// One writer (the input event path), many readers (every particle, every
/// tick). The frame scheduler owns the tracker and only writes to it between
/// ticks.
#[derive(Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// The pointer moved to `position`.
    pub fn moved(&mut self, position: Vec2) {
        self.state = PointerState::Present(position);
    }

    /// The pointer left the surface.
    pub fn left(&mut self) {
        self.state = PointerState::Absent;
    }
}

/// Translate a winit window event into the pointer transition it implies.
///
/// Returns `None` for events that don't affect the pointer.
pub(crate) fn pointer_transition(event: &WindowEvent) -> Option<PointerState> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(PointerState::Present(Vec2::new(
            position.x as f32,
            position.y as f32,
        ))),
        WindowEvent::CursorLeft { .. } => Some(PointerState::Absent),
        _ => None,
    }
}
