use serde::{Deserialize, Serialize};

/// Pan/zoom state mapping world coordinates onto the canvas.
///
/// `offset_*` is the world coordinate shown at the canvas origin and `scale`
/// is canvas pixels per world unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl CameraState {
    #[must_use]
    pub const fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.offset_x.is_finite() && self.offset_y.is_finite() && self.scale.is_finite()
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
