//! Viewport bounds
//!
//! The visible area overlays must not overflow. Placement flips to the
//! mirrored alignment instead of clamping when an overlay would cross a
//! viewport edge.

/// Viewport dimensions, in the same coordinate space as element bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}
