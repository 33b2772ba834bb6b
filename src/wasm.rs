//! Browser-facing wrapper around [`EngineCore`].
//!
//! The host JavaScript layer wires DOM pointer events and the camera widget to
//! these methods and receives the resulting actions as a JSON array. Objects,
//! payloads, and commands cross the boundary as JSON strings.

#[cfg(test)]
#[path = "wasm_test.rs"]
mod wasm_test;

use wasm_bindgen::prelude::*;

use crate::camera::{Camera, Point};
use crate::command::Command;
use crate::doc::NewObject;
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Modifiers};
use crate::layering::Direction;
use crate::sync;

#[wasm_bindgen]
pub struct WasmEngine {
    core: EngineCore,
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self { core: EngineCore::new() }
    }

    pub fn set_camera(&mut self, scale: f64, offset_x: f64, offset_y: f64) {
        self.core.set_camera(Camera::new(scale, offset_x, offset_y));
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.core.set_viewport(width, height);
    }

    /// Replace the collection from a persisted JSON array.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or duplicate ids.
    pub fn load_snapshot(&mut self, json: &str) -> Result<String, JsError> {
        let objects = sync::decode_snapshot(json)?;
        let actions = self.core.load_snapshot(objects)?;
        actions_json(&actions)
    }

    /// Add an object from a JSON creation payload; returns the actions.
    ///
    /// # Errors
    ///
    /// Fails on a malformed payload.
    pub fn add_object(&mut self, json: &str) -> Result<String, JsError> {
        let new: NewObject = serde_json::from_str(json)?;
        let (_, actions) = self.core.add_at_viewport_center(new);
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn remove(&mut self, id: &str) -> Result<String, JsError> {
        let actions = self.core.remove(id);
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn delete_selected(&mut self) -> Result<String, JsError> {
        let actions = self.core.delete_selected();
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn select(&mut self, id: &str) -> Result<String, JsError> {
        let actions = self.core.select(id);
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn deselect(&mut self) -> Result<String, JsError> {
        let actions = self.core.deselect();
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn bring_forward(&mut self, id: &str) -> Result<String, JsError> {
        let actions = self.core.reorder(id, Direction::Forward);
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn send_backward(&mut self, id: &str) -> Result<String, JsError> {
        let actions = self.core.reorder(id, Direction::Backward);
        actions_json(&actions)
    }

    /// Apply a JSON-encoded [`Command`] to the selected object.
    ///
    /// # Errors
    ///
    /// Fails on a malformed command.
    pub fn command(&mut self, json: &str) -> Result<String, JsError> {
        let command: Command = serde_json::from_str(json)?;
        let actions = self.core.apply_command(command);
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<String, JsError> {
        let actions = match Button::from_dom(button) {
            Some(button) => self.core.on_pointer_down(Point::new(x, y), button),
            None => Vec::new(),
        };
        actions_json(&actions)
    }

    /// Queue a move for the next animation frame.
    pub fn pointer_move(&mut self, x: f64, y: f64, shift: bool) {
        self.core.queue_pointer_move(Point::new(x, y), Modifiers { shift });
    }

    /// Call from `requestAnimationFrame`.
    ///
    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn frame(&mut self) -> Result<String, JsError> {
        let actions = self.core.on_frame();
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn pointer_up(&mut self, button: i16) -> Result<String, JsError> {
        let actions = match Button::from_dom(button) {
            Some(button) => self.core.on_pointer_up(button),
            None => Vec::new(),
        };
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn pointer_leave(&mut self) -> Result<String, JsError> {
        let actions = self.core.on_pointer_leave();
        actions_json(&actions)
    }

    /// # Errors
    ///
    /// Fails only if the actions cannot be serialized.
    pub fn double_click(&mut self, x: f64, y: f64) -> Result<String, JsError> {
        let actions = self.core.on_double_click(Point::new(x, y));
        actions_json(&actions)
    }

    /// Ids of the objects to render, bottom-to-top, as a JSON array.
    ///
    /// # Errors
    ///
    /// Fails only if the ids cannot be serialized.
    pub fn visible_ids(&self) -> Result<String, JsError> {
        let ids: Vec<&str> = self.core.visible_objects().iter().map(|o| o.id.as_str()).collect();
        Ok(serde_json::to_string(&ids)?)
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.core.selection().cloned()
    }

    /// Every object, bottom-to-top, as a JSON array.
    ///
    /// # Errors
    ///
    /// Fails only if the objects cannot be serialized.
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(sync::encode_snapshot(&self.core.snapshot())?)
    }
}

fn actions_json(actions: &[Action]) -> Result<String, JsError> {
    Ok(serde_json::to_string(actions)?)
}
