#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::doc::{CanvasObject, Collection, ObjectId};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside the bounding box, away from any corner; arms a drag.
    Body,
    /// Within the rotate catch radius of a corner; arms a rotate.
    RotateCorner(Corner),
}

/// Corner of an object's unrotated bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

const CORNERS: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Find the object under `screen_pt` and classify the press.
///
/// The selected object's corners are checked first so its rotate affordance
/// wins over anything stacked above it. Otherwise objects are scanned top to
/// bottom and the first whose box or corner catch area contains the point
/// wins. The catch radius is fixed in screen pixels, so in canvas space it
/// shrinks as the camera zooms in.
#[must_use]
pub fn hit_test(screen_pt: Point, collection: &Collection, camera: &Camera, rotate_radius_px: f64) -> Option<Hit> {
    let pt = camera.screen_to_canvas(screen_pt);
    let radius = camera.screen_dist_to_canvas(rotate_radius_px);

    if let Some(selected) = collection.selected() {
        if let Some(corner) = corner_at(selected, pt, radius) {
            return Some(Hit { object_id: selected.id.clone(), part: HitPart::RotateCorner(corner) });
        }
    }

    collection.sorted_objects().into_iter().rev().find_map(|obj| {
        if let Some(corner) = corner_at(obj, pt, radius) {
            return Some(Hit { object_id: obj.id.clone(), part: HitPart::RotateCorner(corner) });
        }
        obj.bounds()
            .contains(pt)
            .then(|| Hit { object_id: obj.id.clone(), part: HitPart::Body })
    })
}

fn corner_at(obj: &CanvasObject, pt: Point, radius: f64) -> Option<Corner> {
    obj.bounds()
        .corners()
        .into_iter()
        .zip(CORNERS)
        .find(|(c, _)| c.distance_to(pt) <= radius)
        .map(|(_, corner)| corner)
}
