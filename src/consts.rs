//! Shared numeric constants for the pinboard crate.

// ── Pointer interaction ─────────────────────────────────────────

/// Screen-space distance in pixels a pointer must travel before a press on an
/// object body becomes a drag instead of a click.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Screen-space catch radius in pixels around each corner that arms a rotate.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 12.0;

/// Angular step in degrees used when rotation snapping is requested.
pub const ROTATE_SNAP_DEG: f64 = 15.0;

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height a resize command may produce, in canvas units.
pub const MIN_OBJECT_SIZE: f64 = 10.0;

/// Width and height used when a new object's payload does not specify a size.
pub const DEFAULT_OBJECT_SIZE: f64 = 150.0;

// ── Culling ─────────────────────────────────────────────────────

/// Canvas-space margin added around the viewport before culling.
pub const CULL_PADDING: f64 = 200.0;
