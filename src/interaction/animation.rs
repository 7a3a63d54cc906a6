use serde::{Deserialize, Serialize};

use crate::core::{CameraState, Cell};

/// Cubic ease-out: `1 - (1 - t)^3`.
#[must_use]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// In-flight "jump to cell" camera animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpAnimation {
    pub target_cell: Cell,
    pub start_offset: (f64, f64),
    pub target_offset: (f64, f64),
    pub started_at_ms: f64,
    pub duration_ms: f64,
}

/// One animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpFrame {
    pub offset_x: f64,
    pub offset_y: f64,
    pub finished: bool,
}

impl JumpAnimation {
    #[must_use]
    pub fn new(
        target_cell: Cell,
        from: CameraState,
        to: CameraState,
        started_at_ms: f64,
        duration_ms: f64,
    ) -> Self {
        Self {
            target_cell,
            start_offset: (from.offset_x, from.offset_y),
            target_offset: (to.offset_x, to.offset_y),
            started_at_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Offsets at linear `progress` in `[0, 1]`, after easing.
    #[must_use]
    pub fn sample(&self, progress: f64) -> (f64, f64) {
        if progress >= 1.0 {
            return self.target_offset;
        }
        let eased = ease_out_cubic(progress);
        (
            self.start_offset.0 + (self.target_offset.0 - self.start_offset.0) * eased,
            self.start_offset.1 + (self.target_offset.1 - self.start_offset.1) * eased,
        )
    }

    #[must_use]
    pub fn progress_at(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn frame_at(&self, now_ms: f64) -> JumpFrame {
        let progress = self.progress_at(now_ms);
        let (offset_x, offset_y) = self.sample(progress);
        JumpFrame {
            offset_x,
            offset_y,
            finished: progress >= 1.0,
        }
    }
}
