use serde::{Deserialize, Serialize};

use crate::cache::FetchConfig;
use crate::core::{CameraState, CanvasSize, DEFAULT_CELL_SIZE, WorldPoint};
use crate::error::{CanvasError, CanvasResult};
use crate::interaction::{CameraLimits, InertiaConfig};
use crate::write::WriteConfig;

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist/load canvas setup without
/// inventing their own format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasEngineConfig {
    pub canvas_size: CanvasSize,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default)]
    pub camera_limits: CameraLimits,
    #[serde(default)]
    pub initial_camera: CameraState,
    #[serde(default = "default_swipe_threshold_px")]
    pub swipe_threshold_px: f64,
    #[serde(default = "default_pinch_cooldown_ms")]
    pub pinch_cooldown_ms: f64,
    #[serde(default)]
    pub inertia: InertiaConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub write: WriteConfig,
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: f64,
    #[serde(default = "default_wheel_zoom_sensitivity")]
    pub wheel_zoom_sensitivity: f64,
    #[serde(default = "default_jump_duration_ms")]
    pub jump_duration_ms: f64,
}

impl CanvasEngineConfig {
    /// Creates a config with defaults for everything but the canvas size.
    #[must_use]
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self {
            canvas_size,
            cell_size: default_cell_size(),
            camera_limits: CameraLimits::default(),
            initial_camera: CameraState::default(),
            swipe_threshold_px: default_swipe_threshold_px(),
            pinch_cooldown_ms: default_pinch_cooldown_ms(),
            inertia: InertiaConfig::default(),
            fetch: FetchConfig::default(),
            write: WriteConfig::default(),
            persist_debounce_ms: default_persist_debounce_ms(),
            wheel_zoom_sensitivity: default_wheel_zoom_sensitivity(),
            jump_duration_ms: default_jump_duration_ms(),
        }
    }

    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn with_scale_bounds(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.camera_limits.min_scale = min_scale;
        self.camera_limits.max_scale = max_scale;
        self
    }

    /// Bounds camera offsets so the visible window stays inside `extent`.
    #[must_use]
    pub fn with_max_extent(mut self, extent: WorldPoint) -> Self {
        self.camera_limits.max_extent = Some(extent);
        self
    }

    #[must_use]
    pub fn with_initial_camera(mut self, camera: CameraState) -> Self {
        self.initial_camera = camera;
        self
    }

    #[must_use]
    pub fn with_swipe_threshold_px(mut self, threshold: f64) -> Self {
        self.swipe_threshold_px = threshold;
        self
    }

    #[must_use]
    pub fn with_pinch_cooldown_ms(mut self, cooldown_ms: f64) -> Self {
        self.pinch_cooldown_ms = cooldown_ms;
        self
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: InertiaConfig) -> Self {
        self.inertia = inertia;
        self
    }

    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    #[must_use]
    pub fn with_write(mut self, write: WriteConfig) -> Self {
        self.write = write;
        self
    }

    #[must_use]
    pub fn with_persist_debounce_ms(mut self, debounce_ms: f64) -> Self {
        self.persist_debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_wheel_zoom_sensitivity(mut self, sensitivity: f64) -> Self {
        self.wheel_zoom_sensitivity = sensitivity;
        self
    }

    #[must_use]
    pub fn with_jump_duration_ms(mut self, duration_ms: f64) -> Self {
        self.jump_duration_ms = duration_ms;
        self
    }

    pub fn validate(self) -> CanvasResult<Self> {
        if !self.canvas_size.is_valid() {
            return Err(CanvasError::InvalidViewport {
                width: self.canvas_size.width,
                height: self.canvas_size.height,
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CanvasError::InvalidData(
                "cell_size must be finite and > 0".to_owned(),
            ));
        }
        if !self.initial_camera.is_finite() {
            return Err(CanvasError::InvalidData(
                "initial camera must be finite".to_owned(),
            ));
        }
        for (name, value) in [
            ("swipe_threshold_px", self.swipe_threshold_px),
            ("pinch_cooldown_ms", self.pinch_cooldown_ms),
            ("persist_debounce_ms", self.persist_debounce_ms),
            ("wheel_zoom_sensitivity", self.wheel_zoom_sensitivity),
            ("jump_duration_ms", self.jump_duration_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CanvasError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        self.camera_limits.validate()?;
        self.inertia.validate()?;
        self.fetch.validate()?;
        self.write.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> CanvasResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| CanvasError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> CanvasResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| CanvasError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_swipe_threshold_px() -> f64 {
    10.0
}

fn default_pinch_cooldown_ms() -> f64 {
    300.0
}

fn default_persist_debounce_ms() -> f64 {
    500.0
}

fn default_wheel_zoom_sensitivity() -> f64 {
    0.01
}

fn default_jump_duration_ms() -> f64 {
    500.0
}
