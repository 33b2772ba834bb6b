//! Engine tuning parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;

use tracing::info;

use crate::consts::{CULL_PADDING, DRAG_THRESHOLD_PX, MIN_OBJECT_SIZE, ROTATE_HANDLE_RADIUS_PX, ROTATE_SNAP_DEG};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a number: {value:?}")]
    Parse { var: &'static str, value: String },
    #[error("{var} must be {requirement}, got {value}")]
    OutOfRange { var: &'static str, requirement: &'static str, value: f64 },
}

/// Tunables for pointer interaction, culling, and resize clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Screen pixels a press must travel before it becomes a drag.
    pub drag_threshold_px: f64,
    /// Screen-pixel catch radius around each corner for the rotate affordance.
    pub rotate_handle_radius_px: f64,
    /// Canvas units added around the viewport before culling.
    pub cull_padding: f64,
    /// Snap step in degrees used when Shift is held during a rotate.
    pub rotate_snap_deg: f64,
    /// Smallest width/height a resize command may produce.
    pub min_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DRAG_THRESHOLD_PX,
            rotate_handle_radius_px: ROTATE_HANDLE_RADIUS_PX,
            cull_padding: CULL_PADDING,
            rotate_snap_deg: ROTATE_SNAP_DEG,
            min_size: MIN_OBJECT_SIZE,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables.
    ///
    /// Optional (defaults from [`crate::consts`]):
    /// - `PINBOARD_DRAG_THRESHOLD_PX`: positive
    /// - `PINBOARD_ROTATE_HANDLE_RADIUS_PX`: positive
    /// - `PINBOARD_CULL_PADDING`: zero or more
    /// - `PINBOARD_ROTATE_SNAP_DEG`: positive
    /// - `PINBOARD_MIN_SIZE`: positive
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but unparsable (including
    /// non-UTF-8) or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })?;
        info!(
            drag_threshold_px = config.drag_threshold_px,
            rotate_handle_radius_px = config.rotate_handle_radius_px,
            cull_padding = config.cull_padding,
            rotate_snap_deg = config.rotate_snap_deg,
            min_size = config.min_size,
            "engine config loaded"
        );
        Ok(config)
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a key is present but unparsable or out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            drag_threshold_px: positive(&lookup, "PINBOARD_DRAG_THRESHOLD_PX", defaults.drag_threshold_px)?,
            rotate_handle_radius_px: positive(
                &lookup,
                "PINBOARD_ROTATE_HANDLE_RADIUS_PX",
                defaults.rotate_handle_radius_px,
            )?,
            cull_padding: non_negative(&lookup, "PINBOARD_CULL_PADDING", defaults.cull_padding)?,
            rotate_snap_deg: positive(&lookup, "PINBOARD_ROTATE_SNAP_DEG", defaults.rotate_snap_deg)?,
            min_size: positive(&lookup, "PINBOARD_MIN_SIZE", defaults.min_size)?,
        })
    }
}

fn parse_f64<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ConfigError::Parse { var, value: raw }),
    }
}

fn positive<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_f64(lookup, var, default)?;
    if value <= 0.0 {
        return Err(ConfigError::OutOfRange { var, requirement: "positive", value });
    }
    Ok(value)
}

fn non_negative<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_f64(lookup, var, default)?;
    if value < 0.0 {
        return Err(ConfigError::OutOfRange { var, requirement: "zero or more", value });
    }
    Ok(value)
}
