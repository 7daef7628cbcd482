//! Viewer configuration.
//!
//! Zoom bounds and gesture tuning for the viewer. Two presets exist, one per
//! host variant; either can be overridden field-by-field from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scale change per wheel delta unit.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.0015;
/// Multiplicative step for the toolbar zoom buttons.
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;
/// Maximum gap between two taps for them to count as a double-tap.
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u32 = 300;
/// Travel below which a press-and-release counts as a tap.
pub const DEFAULT_TAP_SLOP_PX: f64 = 6.0;
/// Tolerance when deciding whether the view is "at fit".
pub const DEFAULT_FIT_EPSILON: f64 = 0.05;

/// Which host the viewer is embedded in. Only the zoom bounds differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerVariant {
    /// Stand-alone image viewer.
    Image,
    /// Image laid over a map, which needs a tighter minimum and deeper maximum.
    Overlay,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub double_tap_window_ms: u32,
    pub wheel_sensitivity: f64,
    pub zoom_step: f64,
    pub tap_slop_px: f64,
    pub fit_epsilon: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::for_variant(ViewerVariant::Image)
    }
}

impl ViewerConfig {
    pub fn for_variant(variant: ViewerVariant) -> Self {
        let (min_zoom, max_zoom) = match variant {
            ViewerVariant::Image => (0.2, 4.0),
            ViewerVariant::Overlay => (0.5, 6.0),
        };
        Self {
            min_zoom,
            max_zoom,
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            zoom_step: DEFAULT_ZOOM_STEP,
            tap_slop_px: DEFAULT_TAP_SLOP_PX,
            fit_epsilon: DEFAULT_FIT_EPSILON,
        }
    }

    pub fn with_zoom_bounds(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Check every field, returning the config unchanged when it is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(ConfigError::InvalidZoomBound {
                name: "min_zoom",
                value: self.min_zoom,
            });
        }
        if !(self.max_zoom.is_finite() && self.max_zoom > 0.0) {
            return Err(ConfigError::InvalidZoomBound {
                name: "max_zoom",
                value: self.max_zoom,
            });
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if self.double_tap_window_ms == 0 {
            return Err(ConfigError::ZeroDoubleTapWindow);
        }
        if !(self.wheel_sensitivity.is_finite() && self.wheel_sensitivity > 0.0) {
            return Err(ConfigError::InvalidWheelSensitivity(self.wheel_sensitivity));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::InvalidZoomStep(self.zoom_step));
        }
        if !(self.tap_slop_px >= 0.0 && self.fit_epsilon >= 0.0) {
            return Err(ConfigError::NegativeTolerance);
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidZoomBound { name: &'static str, value: f64 },
    #[error("min_zoom ({min}) is greater than max_zoom ({max})")]
    InvertedZoomBounds { min: f64, max: f64 },
    #[error("double_tap_window_ms must be non-zero")]
    ZeroDoubleTapWindow,
    #[error("wheel_sensitivity must be positive, got {0}")]
    InvalidWheelSensitivity(f64),
    #[error("zoom_step must be greater than 1, got {0}")]
    InvalidZoomStep(f64),
    #[error("tap_slop_px and fit_epsilon must not be negative")]
    NegativeTolerance,
    #[error("malformed viewer config: {0}")]
    Parse(#[from] serde_json::Error),
}
