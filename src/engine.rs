use serde::Serialize;
use tracing::{debug, trace};

use crate::camera::{Camera, Point};
use crate::command::Command;
use crate::config::EngineConfig;
use crate::consts::DEFAULT_OBJECT_SIZE;
use crate::cull;
use crate::doc::{CanvasObject, Collection, NewObject, ObjectId, ObjectKind, PartialObject, Props, now_ms};
use crate::hit::{self, HitPart};
use crate::input::{Button, InteractionState, Modifiers};
use crate::layering::{self, Direction};
use crate::sync::{SyncBridge, SyncError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    ObjectCreated(CanvasObject),
    ObjectUpdated { id: ObjectId, fields: PartialObject },
    ObjectDeleted { id: ObjectId },
    /// A deleted object referenced a stored binary the host should now release.
    AssetReleased { reference: String },
    SelectionChanged(Option<ObjectId>),
    EditContentRequested { id: ObjectId, kind: ObjectKind },
    /// Full object list for the persistence collaborator.
    Persist(Vec<CanvasObject>),
    RenderNeeded,
}

/// Core engine state: collection, camera, and the pointer gesture in progress.
///
/// Everything here is independent of the browser so it can be driven directly
/// from tests. The collection is only ever written through engine methods;
/// callers get read-only views.
pub struct EngineCore {
    collection: Collection,
    camera: Camera,
    config: EngineConfig,
    interaction: InteractionState,
    viewport_width: f64,
    viewport_height: f64,
    sync: SyncBridge,
    /// Latest pointer-move waiting for the next frame.
    pending_move: Option<(Point, Modifiers)>,
    /// Events dropped because their target no longer exists.
    stale_events: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            collection: Collection::new(),
            camera: Camera::default(),
            config,
            interaction: InteractionState::Idle,
            viewport_width: 0.0,
            viewport_height: 0.0,
            sync: SyncBridge::new(),
            pending_move: None,
            stale_events: 0,
        }
    }

    // --- Camera / viewport inputs ---

    /// Adopt the camera pushed by the pan/zoom collaborator.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Update viewport dimensions in screen pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // --- Sync input ---

    /// Replace the whole collection with a persisted snapshot.
    ///
    /// Not treated as a user edit: no `Persist` action follows.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DuplicateId`] if the snapshot repeats an id.
    pub fn load_snapshot(&mut self, objects: Vec<CanvasObject>) -> Result<Vec<Action>, SyncError> {
        self.sync.accept_external(&mut self.collection, objects)?;
        if self.interaction.target().is_some_and(|id| !self.collection.contains(id)) {
            self.cancel_gesture();
        }
        Ok(vec![Action::RenderNeeded])
    }

    // --- Collection operations ---

    /// Add a new object and select it. Returns the allocated id.
    pub fn add(&mut self, new: NewObject) -> (ObjectId, Vec<Action>) {
        let id = self.collection.add(new, now_ms());
        let mut actions = Vec::new();
        if let Some(obj) = self.collection.get(&id) {
            actions.push(Action::ObjectCreated(obj.clone()));
        }
        actions.push(Action::SelectionChanged(Some(id.clone())));
        let actions = self.commit(actions);
        (id, actions)
    }

    /// Add a new object centered in the current viewport.
    pub fn add_at_viewport_center(&mut self, mut new: NewObject) -> (ObjectId, Vec<Action>) {
        let center = self
            .camera
            .screen_to_canvas(Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0));
        new.x = center.x - new.width.unwrap_or(DEFAULT_OBJECT_SIZE) / 2.0;
        new.y = center.y - new.height.unwrap_or(DEFAULT_OBJECT_SIZE) / 2.0;
        self.add(new)
    }

    /// Merge geometry or payload fields into an object.
    pub fn update_geometry(&mut self, id: &str, fields: PartialObject) -> Vec<Action> {
        self.apply_update(id, fields)
    }

    /// Resize around the object's center, clamping to the configured minimum size.
    pub fn resize(&mut self, id: &str, width: f64, height: f64) -> Vec<Action> {
        let min = self.config.min_size;
        let Some(fields) = self
            .collection
            .resize(id, clamp_size(width, min), clamp_size(height, min), now_ms())
        else {
            self.stale(id, "resize");
            return Vec::new();
        };
        self.commit(vec![Action::ObjectUpdated { id: id.to_owned(), fields }])
    }

    pub fn select(&mut self, id: &str) -> Vec<Action> {
        if self.collection.selected_id().is_some_and(|s| s == id) {
            return Vec::new();
        }
        if !self.collection.select(id) {
            self.stale(id, "select");
            return Vec::new();
        }
        self.commit(vec![Action::SelectionChanged(Some(id.to_owned()))])
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        if self.collection.selected_id().is_none() {
            return Vec::new();
        }
        self.collection.deselect();
        self.commit(vec![Action::SelectionChanged(None)])
    }

    /// Remove an object. Clears the selection and any gesture that targeted it.
    pub fn remove(&mut self, id: &str) -> Vec<Action> {
        let was_selected = self.collection.selected_id().is_some_and(|s| s == id);
        let Some(removed) = self.collection.remove(id) else {
            self.stale(id, "remove");
            return Vec::new();
        };
        if self.interaction.target().is_some_and(|t| t == id) {
            self.cancel_gesture();
        }

        let mut actions = vec![Action::ObjectDeleted { id: id.to_owned() }];
        if let Some(reference) = Props::new(&removed.props).media_ref() {
            actions.push(Action::AssetReleased { reference: reference.to_owned() });
        }
        if was_selected {
            actions.push(Action::SelectionChanged(None));
        }
        self.commit(actions)
    }

    /// Remove whatever is selected. Entry point for a Delete/Backspace key listener.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.collection.selected_id().cloned() {
            Some(id) => self.remove(&id),
            None => Vec::new(),
        }
    }

    /// Move an object one overlap-relative step in the stack.
    pub fn reorder(&mut self, id: &str, direction: Direction) -> Vec<Action> {
        if !self.collection.contains(id) {
            self.stale(id, "reorder");
            return Vec::new();
        }
        let actions = z_updates(layering::reorder(&mut self.collection, id, direction, now_ms()));
        self.commit(actions)
    }

    /// Apply a toolbar/key command to the selected object. No-op without a selection.
    pub fn apply_command(&mut self, command: Command) -> Vec<Action> {
        let Some(id) = self.collection.selected_id().cloned() else {
            trace!(?command, "command ignored; nothing selected");
            return Vec::new();
        };
        match command {
            Command::Resize { width, height } => self.resize(&id, width, height),
            Command::ResizeKeepingAspect { width } => {
                let Some(obj) = self.collection.get(&id) else {
                    return Vec::new();
                };
                let ratio = Props::new(&obj.props)
                    .aspect_ratio()
                    .unwrap_or(obj.width / obj.height);
                let width = clamp_size(width, self.config.min_size);
                self.resize(&id, width, width / ratio)
            }
            Command::Delete => self.remove(&id),
            Command::Reorder { direction } => self.reorder(&id, direction),
            Command::SetContent { props } => {
                self.apply_update(&id, PartialObject { props: Some(props), ..Default::default() })
            }
        }
    }

    // --- Pointer input ---

    /// Press over the canvas. Selects the object under the pointer and arms a
    /// drag or rotate; pressing empty canvas clears the selection.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.pending_move = None;

        let Some(hit) = hit::hit_test(screen, &self.collection, &self.camera, self.config.rotate_handle_radius_px)
        else {
            self.interaction = InteractionState::Idle;
            return self.deselect();
        };

        let mut actions = Vec::new();
        if self.collection.selected_id() != Some(&hit.object_id) && self.collection.select(&hit.object_id) {
            actions.push(Action::SelectionChanged(Some(hit.object_id.clone())));
        }
        let Some(obj) = self.collection.get(&hit.object_id) else {
            return self.commit(actions);
        };

        self.interaction = match hit.part {
            HitPart::Body => InteractionState::ArmedForDrag {
                id: hit.object_id,
                down_screen: screen,
                start_x: obj.x,
                start_y: obj.y,
            },
            HitPart::RotateCorner(_) => {
                let center = self.camera.canvas_to_screen(obj.bounds().center());
                InteractionState::ArmedForRotate {
                    id: hit.object_id,
                    start_angle: pointer_angle(center, screen),
                    start_rotation: obj.rotation,
                }
            }
        };
        self.commit(actions)
    }

    /// Pointer moved. Applies immediately; see [`Self::queue_pointer_move`] for
    /// the frame-throttled path.
    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        match self.interaction.clone() {
            InteractionState::Idle => Vec::new(),
            InteractionState::ArmedForDrag { id, down_screen, start_x, start_y } => {
                if screen.distance_to(down_screen) <= self.config.drag_threshold_px {
                    return Vec::new();
                }
                debug!(%id, "drag started");
                self.interaction = InteractionState::Dragging { id: id.clone(), down_screen, start_x, start_y };
                self.drag_to(&id, screen, down_screen, start_x, start_y)
            }
            InteractionState::Dragging { id, down_screen, start_x, start_y } => {
                self.drag_to(&id, screen, down_screen, start_x, start_y)
            }
            InteractionState::ArmedForRotate { id, start_angle, start_rotation } => {
                debug!(%id, "rotate started");
                self.interaction = InteractionState::Rotating { id: id.clone(), start_angle, start_rotation };
                self.rotate_to(&id, screen, start_angle, start_rotation, modifiers.shift)
            }
            InteractionState::Rotating { id, start_angle, start_rotation } => {
                self.rotate_to(&id, screen, start_angle, start_rotation, modifiers.shift)
            }
        }
    }

    /// Record a pointer-move to be applied on the next [`Self::on_frame`].
    /// Later moves overwrite earlier ones.
    pub fn queue_pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        if self.interaction.is_idle() {
            return;
        }
        self.pending_move = Some((screen, modifiers));
    }

    /// Display-frame tick: apply the latest queued pointer-move, if any.
    pub fn on_frame(&mut self) -> Vec<Action> {
        match self.pending_move.take() {
            Some((screen, modifiers)) => self.on_pointer_move(screen, modifiers),
            None => Vec::new(),
        }
    }

    /// Release ends any gesture. A press that never crossed the drag threshold
    /// was a click and leaves geometry untouched.
    pub fn on_pointer_up(&mut self, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let actions = self.on_frame();
        self.end_gesture("pointer up");
        actions
    }

    /// The pointer left the tracked element; terminates any gesture like a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let actions = self.on_frame();
        self.end_gesture("pointer leave");
        actions
    }

    /// Double-click over an object asks the host to open its content editor.
    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        let Some(hit) = hit::hit_test(screen, &self.collection, &self.camera, self.config.rotate_handle_radius_px)
        else {
            return Vec::new();
        };
        let Some(obj) = self.collection.get(&hit.object_id) else {
            return Vec::new();
        };
        vec![Action::EditContentRequested { id: obj.id.clone(), kind: obj.kind }]
    }

    // --- Queries ---

    /// The currently selected object id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&ObjectId> {
        self.collection.selected_id()
    }

    /// The currently selected object, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&CanvasObject> {
        self.collection.selected()
    }

    #[must_use]
    pub fn object(&self, id: &str) -> Option<&CanvasObject> {
        self.collection.get(id)
    }

    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Objects to render this frame, bottom-to-top.
    #[must_use]
    pub fn visible_objects(&self) -> Vec<&CanvasObject> {
        cull::visible_objects(
            &self.collection,
            &self.camera,
            self.viewport_width,
            self.viewport_height,
            self.config.cull_padding,
        )
    }

    /// Owned copy of every object, bottom-to-top.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CanvasObject> {
        self.collection.sorted_objects().into_iter().cloned().collect()
    }

    /// How many events were dropped because their target had been removed.
    #[must_use]
    pub fn stale_events(&self) -> u64 {
        self.stale_events
    }

    // --- Internals ---

    fn drag_to(&mut self, id: &str, screen: Point, down: Point, start_x: f64, start_y: f64) -> Vec<Action> {
        let dx = self.camera.screen_dist_to_canvas(screen.x - down.x);
        let dy = self.camera.screen_dist_to_canvas(screen.y - down.y);
        self.apply_update(id, PartialObject::position(start_x + dx, start_y + dy))
    }

    fn rotate_to(&mut self, id: &str, screen: Point, start_angle: f64, start_rotation: f64, snap: bool) -> Vec<Action> {
        let Some(obj) = self.collection.get(id) else {
            self.stale(id, "rotate");
            self.cancel_gesture();
            return Vec::new();
        };
        let center = self.camera.canvas_to_screen(obj.bounds().center());
        let mut rotation = start_rotation + (pointer_angle(center, screen) - start_angle).to_degrees();
        if snap {
            let step = self.config.rotate_snap_deg;
            rotation = (rotation / step).round() * step;
        }
        self.apply_update(id, PartialObject::rotation(rotation))
    }

    /// Merge `fields` into an object. A z-index goes through
    /// [`layering::assign_z`], so any class shift it causes is reported too.
    fn apply_update(&mut self, id: &str, mut fields: PartialObject) -> Vec<Action> {
        if !self.collection.contains(id) {
            self.stale(id, "update");
            if self.interaction.target().is_some_and(|t| t == id) {
                self.cancel_gesture();
            }
            return Vec::new();
        }
        let now = now_ms();
        let z_index = fields.z_index.take();
        let mut actions = Vec::new();
        if fields != PartialObject::default() {
            self.collection.update(id, &fields, now);
            actions.push(Action::ObjectUpdated { id: id.to_owned(), fields });
        }
        if let Some(z) = z_index {
            actions.extend(z_updates(layering::assign_z(&mut self.collection, id, z, now)));
        }
        self.commit(actions)
    }

    /// Append the sync emission (if the collection materially changed) and a
    /// render request to a non-empty action list.
    fn commit(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        if let Some(objects) = self.sync.observe(&self.collection) {
            actions.push(Action::Persist(objects));
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn end_gesture(&mut self, reason: &'static str) {
        let previous = std::mem::take(&mut self.interaction);
        if previous.is_active() {
            debug!(id = ?previous.target(), reason, "gesture ended");
        }
    }

    fn cancel_gesture(&mut self) {
        self.interaction = InteractionState::Idle;
        self.pending_move = None;
    }

    fn stale(&mut self, id: &str, op: &'static str) {
        self.stale_events += 1;
        trace!(%id, op, "ignoring event for missing object");
    }
}

fn z_updates(changed: Vec<(ObjectId, i64)>) -> Vec<Action> {
    changed
        .into_iter()
        .map(|(id, z)| Action::ObjectUpdated { id, fields: PartialObject::z_index(z) })
        .collect()
}

/// Angle in radians of `pt` around `center`, screen space.
fn pointer_angle(center: Point, pt: Point) -> f64 {
    (pt.y - center.y).atan2(pt.x - center.x)
}

fn clamp_size(value: f64, min: f64) -> f64 {
    if value.is_finite() { value.max(min) } else { min }
}
