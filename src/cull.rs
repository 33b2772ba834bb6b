//! Viewport culling: the subset of objects worth rendering and hit-testing.
//!
//! This is a plain per-frame filter over the whole collection. Object counts
//! stay in the low hundreds, so no spatial index is kept.

#[cfg(test)]
#[path = "cull_test.rs"]
mod cull_test;

use crate::camera::Camera;
use crate::doc::{CanvasObject, Collection};
use crate::geom::Rect;

/// Canvas-space bounds of the viewport grown by `padding` on every side.
#[must_use]
pub fn padded_bounds(camera: &Camera, viewport_width: f64, viewport_height: f64, padding: f64) -> Rect {
    camera.visible_bounds(viewport_width, viewport_height).expand(padding)
}

/// Objects intersecting the padded viewport, bottom-to-top.
///
/// The selected object is always included, wherever it is, so an in-flight
/// drag or rotate is never cut off by culling.
#[must_use]
pub fn visible_objects<'a>(
    collection: &'a Collection,
    camera: &Camera,
    viewport_width: f64,
    viewport_height: f64,
    padding: f64,
) -> Vec<&'a CanvasObject> {
    let bounds = padded_bounds(camera, viewport_width, viewport_height, padding);
    let selected = collection.selected_id();
    collection
        .sorted_objects()
        .into_iter()
        .filter(|obj| Some(&obj.id) == selected || obj.bounds().intersects(&bounds))
        .collect()
}
