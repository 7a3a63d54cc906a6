use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Tuning for per-frame inertial panning after a drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertiaConfig {
    /// Multiplicative velocity decay applied once per frame, in `(0, 1)`.
    pub damping: f64,
    /// Inertia stops once the speed (screen px per frame) is at or below this.
    pub stop_threshold: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            damping: 0.95,
            stop_threshold: 0.5,
        }
    }
}

impl InertiaConfig {
    pub fn validate(self) -> CanvasResult<Self> {
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping >= 1.0 {
            return Err(CanvasError::InvalidData(
                "inertia damping must be finite and in (0, 1)".to_owned(),
            ));
        }
        if !self.stop_threshold.is_finite() || self.stop_threshold <= 0.0 {
            return Err(CanvasError::InvalidData(
                "inertia stop_threshold must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Public inertia runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InertiaState {
    pub active: bool,
    pub velocity_x: f64,
    pub velocity_y: f64,
}

impl InertiaState {
    #[must_use]
    pub fn speed(self) -> f64 {
        self.velocity_x.hypot(self.velocity_y)
    }

    pub fn start(&mut self, velocity_x: f64, velocity_y: f64) {
        self.active = true;
        self.velocity_x = velocity_x;
        self.velocity_y = velocity_y;
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Advances one frame and returns the screen delta to pan by.
    ///
    /// Returns `None` (and deactivates) once speed is at or below the stop
    /// threshold.
    pub fn step(&mut self, config: InertiaConfig) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        if self.speed() <= config.stop_threshold {
            self.stop();
            return None;
        }

        let delta = (self.velocity_x, self.velocity_y);
        self.velocity_x *= config.damping;
        self.velocity_y *= config.damping;
        Some(delta)
    }
}
