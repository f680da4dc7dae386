//! Windowing-agnostic input types.
//!
//! The viewport and camera controllers consume these; the host's window
//! layer translates its native events into them.

/// Pressed or released.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Mouse scroll delta.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseScrollDelta {
    /// Whole scroll-wheel notches.
    LineDelta(f32, f32),
    /// Pixel-precise trackpad scrolling.
    PixelDelta(f32, f32),
}

impl MouseScrollDelta {
    /// Vertical scroll amount normalized to wheel notches.
    pub fn vertical(&self) -> f32 {
        match self {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(_, y) => y / 100.0,
        }
    }
}
