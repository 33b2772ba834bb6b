//! Sync bridge between the collection and external persistence.
//!
//! DESIGN
//! ======
//! The bridge remembers a fingerprint of the last state it either emitted or
//! received from outside. A mutation is emitted only when the current
//! fingerprint differs field-by-field (geometry, z-index, payload, and set
//! membership). Snapshots pushed in by the persistence layer update the
//! fingerprint without emitting, so a load is never echoed back as a save.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashSet;

use tracing::debug;

use crate::doc::{CanvasObject, Collection, ObjectId};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("duplicate object id in snapshot: {0}")]
    DuplicateId(ObjectId),
}

/// The fields that make two states materially different.
#[derive(Debug, Clone, PartialEq)]
struct Fingerprint {
    id: ObjectId,
    x: f64,
    y: f64,
    rotation: f64,
    width: f64,
    height: f64,
    z_index: i64,
    props: serde_json::Value,
}

impl From<&CanvasObject> for Fingerprint {
    fn from(obj: &CanvasObject) -> Self {
        Self {
            id: obj.id.clone(),
            x: obj.x,
            y: obj.y,
            rotation: obj.rotation,
            width: obj.width,
            height: obj.height,
            z_index: obj.z_index,
            props: obj.props.clone(),
        }
    }
}

fn fingerprint<'a, I>(objects: I) -> Vec<Fingerprint>
where
    I: IntoIterator<Item = &'a CanvasObject>,
{
    let mut fp: Vec<Fingerprint> = objects.into_iter().map(Fingerprint::from).collect();
    fp.sort_by(|a, b| a.id.cmp(&b.id));
    fp
}

/// Change detector sitting between the collection and its persistence collaborator.
#[derive(Debug, Default)]
pub struct SyncBridge {
    last: Vec<Fingerprint>,
}

impl SyncBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with an externally supplied snapshot.
    ///
    /// This is not a user edit: the snapshot becomes the new baseline and no
    /// emission follows unless the collection later diverges from it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DuplicateId`] if two objects share an id; the
    /// collection is left untouched.
    pub fn accept_external(&mut self, collection: &mut Collection, objects: Vec<CanvasObject>) -> Result<(), SyncError> {
        let mut seen = HashSet::with_capacity(objects.len());
        for obj in &objects {
            if !seen.insert(obj.id.as_str()) {
                return Err(SyncError::DuplicateId(obj.id.clone()));
            }
        }
        self.last = fingerprint(&objects);
        debug!(count = objects.len(), "external snapshot accepted");
        collection.load_snapshot(objects);
        Ok(())
    }

    /// Return the full object list if the collection changed materially since
    /// the last baseline, and adopt it as the new baseline.
    pub fn observe(&mut self, collection: &Collection) -> Option<Vec<CanvasObject>> {
        let current = fingerprint(collection.iter());
        if current == self.last {
            return None;
        }
        self.last = current;
        let objects: Vec<CanvasObject> = collection.sorted_objects().into_iter().cloned().collect();
        debug!(count = objects.len(), "collection changed; emitting snapshot");
        Some(objects)
    }
}

/// Parse a JSON array of objects as produced by [`encode_snapshot`].
///
/// # Errors
///
/// Returns [`SyncError::Decode`] if the input is not a valid object list.
pub fn decode_snapshot(json: &str) -> Result<Vec<CanvasObject>, SyncError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize an object list to a JSON array.
///
/// # Errors
///
/// Returns [`SyncError::Decode`] if serialization fails.
pub fn encode_snapshot(objects: &[CanvasObject]) -> Result<String, SyncError> {
    Ok(serde_json::to_string(objects)?)
}
