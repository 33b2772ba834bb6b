use serde_json::json;

use super::*;
use crate::doc::{CanvasObject, ObjectKind};

const RADIUS: f64 = 12.0;

fn square(id: &str, x: f64, y: f64, size: f64, z: i64) -> CanvasObject {
    CanvasObject {
        id: id.to_owned(),
        kind: ObjectKind::Photo,
        x,
        y,
        width: size,
        height: size,
        rotation: 0.0,
        z_index: z,
        created_at: 0,
        updated_at: 0,
        props: json!({}),
    }
}

fn collection_with(objects: Vec<CanvasObject>) -> Collection {
    let mut c = Collection::new();
    c.load_snapshot(objects);
    c
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// HitPart / Corner
// =============================================================

#[test]
fn hit_part_variants_distinct() {
    assert_ne!(HitPart::Body, HitPart::RotateCorner(Corner::TopLeft));
    assert_ne!(HitPart::RotateCorner(Corner::TopLeft), HitPart::RotateCorner(Corner::BottomRight));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn empty_collection_hits_nothing() {
    let c = Collection::new();
    assert!(hit_test(pt(0.0, 0.0), &c, &Camera::default(), RADIUS).is_none());
}

#[test]
fn interior_point_hits_body() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    let hit = hit_test(pt(50.0, 50.0), &c, &Camera::default(), RADIUS).unwrap();
    assert_eq!(hit, Hit { object_id: "1".to_owned(), part: HitPart::Body });
}

#[test]
fn point_near_corner_hits_rotate_corner() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    let hit = hit_test(pt(2.0, 3.0), &c, &Camera::default(), RADIUS).unwrap();
    assert_eq!(hit.part, HitPart::RotateCorner(Corner::TopLeft));
}

#[test]
fn corner_catch_area_extends_outside_the_box() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    let hit = hit_test(pt(105.0, 105.0), &c, &Camera::default(), RADIUS).unwrap();
    assert_eq!(hit.part, HitPart::RotateCorner(Corner::BottomRight));
}

#[test]
fn each_corner_is_classified() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    let cam = Camera::default();
    let cases = [
        (pt(1.0, 1.0), Corner::TopLeft),
        (pt(99.0, 1.0), Corner::TopRight),
        (pt(99.0, 99.0), Corner::BottomRight),
        (pt(1.0, 99.0), Corner::BottomLeft),
    ];
    for (p, corner) in cases {
        assert_eq!(hit_test(p, &c, &cam, RADIUS).unwrap().part, HitPart::RotateCorner(corner));
    }
}

#[test]
fn far_point_misses() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    assert!(hit_test(pt(300.0, 300.0), &c, &Camera::default(), RADIUS).is_none());
}

#[test]
fn topmost_object_wins() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1), square("2", 20.0, 20.0, 100.0, 2)]);
    let hit = hit_test(pt(50.0, 50.0), &c, &Camera::default(), RADIUS).unwrap();
    assert_eq!(hit.object_id, "2");
}

#[test]
fn selected_corner_beats_object_above() {
    let mut c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1), square("2", -50.0, -50.0, 100.0, 2)]);
    let cam = Camera::default();
    assert_eq!(
        hit_test(pt(1.0, 1.0), &c, &cam, RADIUS).unwrap(),
        Hit { object_id: "2".to_owned(), part: HitPart::Body }
    );

    c.select("1");
    assert_eq!(
        hit_test(pt(1.0, 1.0), &c, &cam, RADIUS).unwrap(),
        Hit { object_id: "1".to_owned(), part: HitPart::RotateCorner(Corner::TopLeft) }
    );
}

#[test]
fn camera_offset_is_respected() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    let cam = Camera::new(1.0, 100.0, 100.0);
    assert_eq!(hit_test(pt(150.0, 150.0), &c, &cam, RADIUS).unwrap().part, HitPart::Body);
    assert!(hit_test(pt(50.0, 50.0), &c, &cam, RADIUS).is_none());
}

#[test]
fn corner_catch_area_shrinks_in_canvas_space_when_zoomed_in() {
    let c = collection_with(vec![square("1", 0.0, 0.0, 100.0, 1)]);
    // Same canvas point (4, 0): a corner at 1x, plain body at 4x.
    let at_1x = Camera::default();
    assert_eq!(
        hit_test(at_1x.canvas_to_screen(pt(4.0, 0.0)), &c, &at_1x, RADIUS).unwrap().part,
        HitPart::RotateCorner(Corner::TopLeft)
    );
    let at_4x = Camera::new(4.0, 0.0, 0.0);
    assert_eq!(hit_test(at_4x.canvas_to_screen(pt(4.0, 0.0)), &c, &at_4x, RADIUS).unwrap().part, HitPart::Body);
}
