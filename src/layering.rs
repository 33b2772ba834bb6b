//! Overlap-aware z-order layering.
//!
//! "Bring forward" leapfrogs only the nearest same-class object that visually
//! overlaps the target and sits above it. Objects that never overlap the
//! target play no part in its ordering. With nothing overlapping above, the
//! target goes to the top of its own class. "Send backward" mirrors this.
//! Objects sharing a z-index are ordered by id, exactly as they are drawn.
//!
//! Reordering never crosses layering classes. After every assignment,
//! [`normalize_class_order`] re-establishes `max(decoration) < min(content)`
//! by shifting whole classes, so relative order within each class survives.

#[cfg(test)]
#[path = "layering_test.rs"]
mod layering_test;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{CanvasObject, Collection, LayeringClass, draw_order};

/// Which way to move an object in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Compute the z-index `id` would move to, without mutating anything.
///
/// "Above" and "below" follow draw order, so a peer sharing the target's
/// z-index still counts as above or below it. Returns `None` when the id is
/// absent, when the object is alone in its class, or when no peer draws on
/// the far side of it in `direction`.
#[must_use]
pub fn plan_reorder(collection: &Collection, id: &str, direction: Direction) -> Option<i64> {
    let target = collection.get(id)?;
    let class = target.layering_class();
    let bounds = target.bounds();
    let wanted = match direction {
        Direction::Forward => Ordering::Greater,
        Direction::Backward => Ordering::Less,
    };
    let beyond: Vec<&CanvasObject> = collection
        .iter()
        .filter(|o| o.id != target.id && o.layering_class() == class)
        .filter(|o| draw_order(o, target) == wanted)
        .collect();
    if beyond.is_empty() {
        return None;
    }

    let neighbor = beyond
        .iter()
        .filter(|o| o.bounds().intersects(&bounds))
        .copied();

    match direction {
        Direction::Forward => match neighbor.min_by(|a, b| draw_order(a, b)) {
            Some(n) => Some(n.z_index + 1),
            None => beyond.iter().map(|o| o.z_index).max().map(|top| top + 1),
        },
        Direction::Backward => match neighbor.max_by(|a, b| draw_order(a, b)) {
            Some(n) => Some(n.z_index - 1),
            None => beyond.iter().map(|o| o.z_index).min().map(|bottom| bottom - 1),
        },
    }
}

/// Move `id` one overlap-relative step in `direction`.
///
/// Returns every object whose z-index changed as `(id, new_z)`, the target
/// first. Empty when nothing moved.
pub fn reorder(collection: &mut Collection, id: &str, direction: Direction, now: i64) -> Vec<(String, i64)> {
    let Some(new_z) = plan_reorder(collection, id, direction) else {
        return Vec::new();
    };
    debug!(%id, ?direction, new_z, "object reordered");
    assign_z(collection, id, new_z, now)
}

/// Set `id`'s z-index, then restore the class ordering.
///
/// A negative z lifts every object so the target lands at 0. Returns every
/// object whose z-index changed as `(id, new_z)`, the target first; empty if
/// the id is absent.
pub fn assign_z(collection: &mut Collection, id: &str, z_index: i64, now: i64) -> Vec<(String, i64)> {
    if !collection.contains(id) {
        return Vec::new();
    }
    let before = z_snapshot(collection);
    let mut z_index = z_index;
    if z_index < 0 {
        shift(collection, -z_index, now, |_| true);
        z_index = 0;
    }
    if let Some(target) = collection.iter_mut().find(|o| o.id == id) {
        target.z_index = z_index;
        target.updated_at = now;
    }
    normalize_class_order(collection, now);
    changed_since(collection, &before, id)
}

/// Restore `max(decoration z) < min(content z)` by lifting the content class.
///
/// Returns true if anything moved.
pub fn normalize_class_order(collection: &mut Collection, now: i64) -> bool {
    let (Some((_, deco_max)), Some((content_min, _))) = (
        collection.class_z_range(LayeringClass::Decoration),
        collection.class_z_range(LayeringClass::Content),
    ) else {
        return false;
    };
    if deco_max < content_min {
        return false;
    }
    let delta = deco_max - content_min + 1;
    debug!(delta, "lifting content class above decorations");
    shift(collection, delta, now, |o| o.layering_class() == LayeringClass::Content);
    true
}

/// Whether the class ordering invariant currently holds.
#[must_use]
pub fn class_order_holds(collection: &Collection) -> bool {
    match (
        collection.class_z_range(LayeringClass::Decoration),
        collection.class_z_range(LayeringClass::Content),
    ) {
        (Some((_, deco_max)), Some((content_min, _))) => deco_max < content_min,
        _ => true,
    }
}

fn shift<F>(collection: &mut Collection, delta: i64, now: i64, pred: F)
where
    F: Fn(&CanvasObject) -> bool,
{
    for obj in collection.iter_mut().filter(|o| pred(o)) {
        obj.z_index += delta;
        obj.updated_at = now;
    }
}

fn z_snapshot(collection: &Collection) -> Vec<(String, i64)> {
    collection.iter().map(|o| (o.id.clone(), o.z_index)).collect()
}

fn changed_since(collection: &Collection, before: &[(String, i64)], target_id: &str) -> Vec<(String, i64)> {
    let mut changed: Vec<(String, i64)> = before
        .iter()
        .filter_map(|(id, old_z)| {
            let obj = collection.get(id)?;
            (obj.z_index != *old_z || id == target_id).then(|| (id.clone(), obj.z_index))
        })
        .collect();
    changed.sort_by_key(|(id, _)| id != target_id);
    changed
}
