//! Coordinate transform between screen space and canvas space.
//!
//! The camera itself is owned by the host's pan/zoom layer; this crate only
//! reads it. Canvas-to-screen mapping is `screen = canvas * scale + offset`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::geom::Rect;

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("camera scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

/// Camera state pushed in by the pan/zoom collaborator.
///
/// `offset_x` / `offset_y` are in screen pixels.
/// `scale` is a zoom factor (1.0 = no zoom) and must stay positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self { scale, offset_x, offset_y }
    }

    /// Build a camera, rejecting a zero, negative, or non-finite scale.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidScale`] when `scale` is unusable.
    pub fn try_new(scale: f64, offset_x: f64, offset_y: f64) -> Result<Self, CameraError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CameraError::InvalidScale(scale));
        }
        Ok(Self::new(scale, offset_x, offset_y))
    }

    /// Convert a screen-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.offset_x,
            y: canvas.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a canvas-space distance.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Canvas-space rectangle visible through a viewport of the given screen size.
    #[must_use]
    pub fn visible_bounds(&self, viewport_width: f64, viewport_height: f64) -> Rect {
        let left = -self.offset_x / self.scale;
        let top = -self.offset_y / self.scale;
        let right = (viewport_width - self.offset_x) / self.scale;
        let bottom = (viewport_height - self.offset_y) / self.scale;
        Rect::from_edges(left, top, right, bottom)
    }
}
