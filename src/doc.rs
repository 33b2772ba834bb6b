//! Document model: placed objects, their payload, and the item collection.
//!
//! This module defines what sits on the canvas (`CanvasObject`, `ObjectKind`),
//! the creation payload handed in by toolbars and pickers (`NewObject`), a
//! sparse-update type for incremental edits (`PartialObject`), a typed accessor
//! for the opaque `props` JSON bag (`Props`), and the authoritative store that
//! owns every live object plus the current selection (`Collection`).
//!
//! The collection is the only writer of object state. Operations that target a
//! missing id are no-ops and report that through their return value rather
//! than an error, because pointer events routinely race with deletion.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::cmp::Ordering;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::DEFAULT_OBJECT_SIZE;
use crate::geom::Rect;
use crate::layering;

/// Identifier for a placed object. Allocated as a decimal string.
pub type ObjectId = String;

/// The kind of a placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    /// Photo backed by a stored image.
    Photo,
    /// Free-form text note.
    Note,
    /// Solid block of color.
    ColorBlock,
    /// Embedded song or video player.
    EmbeddedMedia,
    /// Single emoji glyph.
    Emoji,
    /// Sticker image picked from a catalog.
    Sticker,
    /// Background ornament; always layered behind everything else.
    Decoration,
}

impl ObjectKind {
    /// Which layering class objects of this kind belong to.
    #[must_use]
    pub fn layering_class(self) -> LayeringClass {
        match self {
            Self::Decoration => LayeringClass::Decoration,
            _ => LayeringClass::Content,
        }
    }
}

/// Partition of objects that bounds how far reordering can move them.
///
/// Every decoration stacks below every content object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayeringClass {
    Decoration,
    Content,
}

/// A placed object as stored in the collection and handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    /// Unique identifier within the collection.
    pub id: ObjectId,
    /// Content type; decides the layering class.
    pub kind: ObjectKind,
    /// Left edge of the bounding box in canvas space.
    pub x: f64,
    /// Top edge of the bounding box in canvas space.
    pub y: f64,
    /// Width of the bounding box in canvas space.
    pub width: f64,
    /// Height of the bounding box in canvas space.
    pub height: f64,
    /// Clockwise rotation in degrees. Never wrapped into `[0, 360)`.
    pub rotation: f64,
    /// Stacking key; only relative order matters.
    pub z_index: i64,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last mutation time, milliseconds since the Unix epoch.
    pub updated_at: i64,
    /// Kind-specific payload (text, color, media reference, aspect ratio, ...).
    #[serde(default)]
    pub props: serde_json::Value,
}

impl CanvasObject {
    /// Unrotated bounding box in canvas space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[must_use]
    pub fn layering_class(&self) -> LayeringClass {
        self.kind.layering_class()
    }
}

/// Creation payload supplied by add-content entry points.
///
/// The collection owns id, z-index, and timestamps; everything else comes from
/// here. Missing sizes fall back to [`DEFAULT_OBJECT_SIZE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObject {
    pub kind: ObjectKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub props: serde_json::Value,
}

impl NewObject {
    /// A payload of the given kind at the canvas origin with default size.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self { kind, x: 0.0, y: 0.0, width: None, height: None, rotation: None, props: serde_json::Value::Null }
    }

    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = props;
        self
    }
}

/// Sparse update for an object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Props keys to merge or remove (null values delete keys).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Value>,
}

impl PartialObject {
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    #[must_use]
    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    #[must_use]
    pub fn z_index(z_index: i64) -> Self {
        Self { z_index: Some(z_index), ..Default::default() }
    }
}

/// Typed access to common props fields from a `CanvasObject.props` value.
pub struct Props<'a> {
    value: &'a serde_json::Value,
}

impl<'a> Props<'a> {
    #[must_use]
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self { value }
    }

    /// Note or caption text. Empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// Fill color as a CSS color string, if set.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.value.get("color").and_then(|v| v.as_str())
    }

    /// Reference to a stored binary asset (image blob, media id), if any.
    #[must_use]
    pub fn media_ref(&self) -> Option<&str> {
        self.value
            .get("media_ref")
            .or_else(|| self.value.get("image_ref"))
            .and_then(|v| v.as_str())
    }

    /// Width / height ratio to preserve when resizing, if the payload carries one.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.value
            .get("aspect_ratio")
            .and_then(serde_json::Value::as_f64)
            .filter(|r| r.is_finite() && *r > 0.0)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
#[must_use]
pub fn now_ms() -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    {
        js_sys::Date::now() as i64
    }
}

/// Numeric value of an id, if it parses as one.
fn numeric_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok()
}

/// Draw-order comparison: z-index first, then numeric id, then raw id.
pub(crate) fn draw_order(a: &CanvasObject, b: &CanvasObject) -> Ordering {
    a.z_index
        .cmp(&b.z_index)
        .then_with(|| numeric_id(&a.id).cmp(&numeric_id(&b.id)))
        .then_with(|| a.id.cmp(&b.id))
}

/// The authoritative set of placed objects plus the current selection.
pub struct Collection {
    objects: HashMap<ObjectId, CanvasObject>,
    selected: Option<ObjectId>,
    /// Highest numeric id ever present this session; ids are never reissued.
    id_high_water: u64,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self { objects: HashMap::new(), selected: None, id_high_water: 0 }
    }

    /// Add a new object, allocating its id and z-index, and select it.
    ///
    /// Content objects land on top of everything. Decorations land just below
    /// the lowest content object (never below zero); if that collides with
    /// content, the content class is shifted up to restore ordering.
    pub fn add(&mut self, new: NewObject, now: i64) -> ObjectId {
        let id = self.allocate_id();
        let z_index = self.initial_z_index(new.kind.layering_class());
        let obj = CanvasObject {
            id: id.clone(),
            kind: new.kind,
            x: new.x,
            y: new.y,
            width: new.width.unwrap_or(DEFAULT_OBJECT_SIZE),
            height: new.height.unwrap_or(DEFAULT_OBJECT_SIZE),
            rotation: new.rotation.unwrap_or(0.0),
            z_index,
            created_at: now,
            updated_at: now,
            props: new.props,
        };
        debug!(%id, kind = ?obj.kind, z_index, "object added");
        self.objects.insert(id.clone(), obj);
        layering::normalize_class_order(self, now);
        self.selected = Some(id.clone());
        id
    }

    fn allocate_id(&mut self) -> ObjectId {
        let max_present = self
            .objects
            .keys()
            .filter_map(|id| numeric_id(id))
            .max()
            .unwrap_or(0);
        self.id_high_water = self.id_high_water.max(max_present) + 1;
        self.id_high_water.to_string()
    }

    fn initial_z_index(&self, class: LayeringClass) -> i64 {
        match class {
            LayeringClass::Content => self.objects.values().map(|o| o.z_index).max().map_or(1, |z| z + 1),
            LayeringClass::Decoration => {
                let below_content = self.class_z_range(LayeringClass::Content).map(|(min, _)| min - 1);
                let above_decorations = self.class_z_range(LayeringClass::Decoration).map(|(_, max)| max + 1);
                below_content.or(above_decorations).unwrap_or(0).max(0)
            }
        }
    }

    /// Inclusive `(min, max)` z-index over one layering class, if it has members.
    #[must_use]
    pub fn class_z_range(&self, class: LayeringClass) -> Option<(i64, i64)> {
        self.objects
            .values()
            .filter(|o| o.layering_class() == class)
            .fold(None, |acc, o| match acc {
                None => Some((o.z_index, o.z_index)),
                Some((min, max)) => Some((min.min(o.z_index), max.max(o.z_index))),
            })
    }

    /// Apply a partial update and stamp `updated_at`. Returns false if the id is absent.
    ///
    /// A z-index write is followed by class-order normalization, so a
    /// decoration can never end up at or above content.
    pub fn update(&mut self, id: &str, partial: &PartialObject, now: i64) -> bool {
        let Some(obj) = self.objects.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            obj.x = x;
        }
        if let Some(y) = partial.y {
            obj.y = y;
        }
        if let Some(w) = partial.width {
            obj.width = w;
        }
        if let Some(h) = partial.height {
            obj.height = h;
        }
        if let Some(r) = partial.rotation {
            obj.rotation = r;
        }
        if let Some(z) = partial.z_index {
            obj.z_index = z;
        }
        if let Some(ref props) = partial.props {
            merge_props(&mut obj.props, props);
        }
        obj.updated_at = now;
        if partial.z_index.is_some() {
            layering::normalize_class_order(self, now);
        }
        true
    }

    /// Resize an object around its current center.
    ///
    /// The caller is responsible for clamping `width`/`height` to positive values.
    /// Returns the applied update, or `None` if the id is absent.
    pub fn resize(&mut self, id: &str, width: f64, height: f64, now: i64) -> Option<PartialObject> {
        let center = self.objects.get(id)?.bounds().center();
        let partial = PartialObject {
            x: Some(center.x - width / 2.0),
            y: Some(center.y - height / 2.0),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        };
        self.update(id, &partial, now);
        Some(partial)
    }

    /// Remove an object, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: &str) -> Option<CanvasObject> {
        let removed = self.objects.remove(id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        debug!(%id, "object removed");
        Some(removed)
    }

    /// Select an object. Returns false (and leaves the selection alone) if the id is absent.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.objects.contains_key(id) {
            return false;
        }
        self.selected = Some(id.to_owned());
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&CanvasObject> {
        self.selected.as_ref().and_then(|id| self.objects.get(id))
    }

    /// Replace every object with an externally supplied snapshot.
    ///
    /// The selection survives only if its object is still present. Ids seen in
    /// the snapshot raise the allocation high-water mark.
    pub fn load_snapshot(&mut self, objects: Vec<CanvasObject>) {
        self.objects.clear();
        for obj in objects {
            self.objects.insert(obj.id.clone(), obj);
        }
        if let Some(max) = self.objects.keys().filter_map(|id| numeric_id(id)).max() {
            self.id_high_water = self.id_high_water.max(max);
        }
        if self.selected.as_ref().is_some_and(|id| !self.objects.contains_key(id)) {
            self.selected = None;
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CanvasObject> {
        self.objects.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// All objects in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &CanvasObject> {
        self.objects.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut CanvasObject> {
        self.objects.values_mut()
    }

    /// All objects sorted bottom-to-top for drawing.
    #[must_use]
    pub fn sorted_objects(&self) -> Vec<&CanvasObject> {
        let mut objs: Vec<&CanvasObject> = self.objects.values().collect();
        objs.sort_by(|a, b| draw_order(a, b));
        objs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_props(target: &mut serde_json::Value, incoming: &serde_json::Value) {
    let Some(incoming) = incoming.as_object() else {
        return;
    };
    if !target.is_object() {
        *target = serde_json::json!({});
    }
    if let Some(existing) = target.as_object_mut() {
        for (k, v) in incoming {
            if v.is_null() {
                existing.remove(k);
            } else {
                existing.insert(k.clone(), v.clone());
            }
        }
    }
}
