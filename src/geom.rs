//! Axis-aligned rectangles used for overlap tests, culling, and handle lookup.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use crate::camera::Point;

/// An axis-aligned box described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { x: left, y: top, width: right - left, height: bottom - top }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// Grow the rectangle by `pad` on every side.
    #[must_use]
    pub fn expand(&self, pad: f64) -> Self {
        Self::from_edges(self.left() - pad, self.top() - pad, self.right() + pad, self.bottom() + pad)
    }

    /// Whether two rectangles overlap. Touching edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Whether `pt` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.left() && pt.x <= self.right() && pt.y >= self.top() && pt.y <= self.bottom()
    }
}
