use serde::{Deserialize, Serialize};

use crate::core::{CameraState, CanvasPoint, CanvasSize, Cell, WorldPoint, cell_center, to_world};
use crate::error::{CanvasError, CanvasResult};

/// Bounds every camera state must satisfy.
///
/// All camera operations are pure: they take the previous state and return
/// the next one, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Optional world extent; offsets keep the visible window inside it.
    #[serde(default)]
    pub max_extent: Option<WorldPoint>,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 2.0,
            max_extent: None,
        }
    }
}

impl CameraLimits {
    pub fn validate(self) -> CanvasResult<Self> {
        if !self.min_scale.is_finite()
            || !self.max_scale.is_finite()
            || self.min_scale <= 0.0
            || self.min_scale > self.max_scale
        {
            return Err(CanvasError::InvalidData(
                "camera scale bounds must be finite with 0 < min_scale <= max_scale".to_owned(),
            ));
        }
        if let Some(extent) = self.max_extent {
            if !extent.x.is_finite() || !extent.y.is_finite() || extent.x < 0.0 || extent.y < 0.0 {
                return Err(CanvasError::InvalidData(
                    "camera max extent must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp_scale(self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Brings a camera into bounds: scale first, then offsets.
    #[must_use]
    pub fn clamp(self, camera: CameraState, canvas: CanvasSize) -> CameraState {
        let scale = self.clamp_scale(camera.scale);
        let (max_x, max_y) = self.max_offsets(canvas, scale);
        CameraState {
            offset_x: clamp_offset(camera.offset_x, max_x),
            offset_y: clamp_offset(camera.offset_y, max_y),
            scale,
        }
    }

    /// Moves the camera by a screen-space delta (`offset -= delta / scale`).
    pub fn pan(
        self,
        camera: CameraState,
        canvas: CanvasSize,
        dx: f64,
        dy: f64,
    ) -> CanvasResult<CameraState> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(CanvasError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }
        let next = CameraState {
            offset_x: camera.offset_x - dx / camera.scale,
            offset_y: camera.offset_y - dy / camera.scale,
            scale: camera.scale,
        };
        finite(next, "pan")?;
        Ok(self.clamp(next, canvas))
    }

    /// Scales by `factor` while keeping the world point under `anchor` fixed.
    pub fn zoom_about(
        self,
        camera: CameraState,
        canvas: CanvasSize,
        anchor: CanvasPoint,
        factor: f64,
    ) -> CanvasResult<CameraState> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CanvasError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(CanvasError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }

        let world_anchor = to_world(anchor, camera);
        let scale = self.clamp_scale(camera.scale * factor);
        let next = CameraState {
            offset_x: world_anchor.x - anchor.x / scale,
            offset_y: world_anchor.y - anchor.y / scale,
            scale,
        };
        finite(next, "zoom")?;
        Ok(self.clamp(next, canvas))
    }

    /// Two-finger zoom; same math as [`CameraLimits::zoom_about`].
    pub fn pinch(
        self,
        camera: CameraState,
        canvas: CanvasSize,
        center: CanvasPoint,
        distance_ratio: f64,
    ) -> CanvasResult<CameraState> {
        self.zoom_about(camera, canvas, center, distance_ratio)
    }

    /// Offsets that put the center of `cell` in the middle of the canvas.
    #[must_use]
    pub fn centered_on(
        self,
        camera: CameraState,
        canvas: CanvasSize,
        cell: Cell,
        cell_size: f64,
    ) -> CameraState {
        let center = cell_center(cell, cell_size);
        let next = CameraState {
            offset_x: center.x - f64::from(canvas.width) / (2.0 * camera.scale),
            offset_y: center.y - f64::from(canvas.height) / (2.0 * camera.scale),
            scale: camera.scale,
        };
        self.clamp(next, canvas)
    }

    fn max_offsets(self, canvas: CanvasSize, scale: f64) -> (Option<f64>, Option<f64>) {
        match self.max_extent {
            Some(extent) => (
                Some((extent.x - f64::from(canvas.width) / scale).max(0.0)),
                Some((extent.y - f64::from(canvas.height) / scale).max(0.0)),
            ),
            None => (None, None),
        }
    }
}

fn finite(camera: CameraState, operation: &str) -> CanvasResult<()> {
    if camera.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::InvalidData(format!(
            "{operation} would move the camera outside finite world space"
        )))
    }
}

fn clamp_offset(offset: f64, max: Option<f64>) -> f64 {
    let offset = if offset.is_nan() { 0.0 } else { offset.max(0.0) };
    match max {
        Some(max) => offset.min(max),
        None => offset,
    }
}
