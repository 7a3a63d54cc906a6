use tracing::{debug, trace};

use crate::core::CameraState;
use crate::render::RenderDriver;

use super::CanvasEngine;

/// Host storage for the last camera position.
pub trait CameraPersistence {
    fn load_camera(&mut self) -> Option<CameraState>;
    fn save_camera(&mut self, camera: CameraState);
}

impl<R: RenderDriver> CanvasEngine<R> {
    /// Attaches camera storage and restores a stored camera, clamped into
    /// bounds. Non-finite stored cameras are ignored.
    pub fn set_camera_persistence(&mut self, mut persistence: Box<dyn CameraPersistence>) {
        if let Some(stored) = persistence.load_camera() {
            if stored.is_finite() {
                let restored = self.limits.clamp(stored, self.canvas_size);
                debug!(camera = ?restored, "restored stored camera");
                self.persistence = Some(persistence);
                self.apply_camera(restored);
                // Nothing new to write back.
                self.persist_pending = false;
                self.persist_due_ms = None;
                return;
            }
            debug!(camera = ?stored, "ignoring non-finite stored camera");
        }
        self.persistence = Some(persistence);
    }

    pub fn clear_camera_persistence(&mut self) -> Option<Box<dyn CameraPersistence>> {
        self.persist_pending = false;
        self.persist_due_ms = None;
        self.persistence.take()
    }

    #[must_use]
    pub fn has_camera_persistence(&self) -> bool {
        self.persistence.is_some()
    }

    /// Marks the camera as changed; the save is timed from the next tick.
    pub(super) fn schedule_camera_save(&mut self) {
        if self.persistence.is_none() {
            return;
        }
        self.persist_pending = true;
        self.persist_due_ms = None;
    }

    /// Debounced save: runs once the camera has been still for the
    /// configured interval.
    pub(super) fn maybe_save_camera(&mut self, now_ms: f64) {
        if !self.persist_pending {
            return;
        }
        let debounce_ms = self.config.persist_debounce_ms;
        let due_ms = *self.persist_due_ms.get_or_insert(now_ms + debounce_ms);
        if now_ms >= due_ms {
            self.flush_camera_save();
        }
    }

    pub(super) fn flush_camera_save(&mut self) {
        if !self.persist_pending {
            return;
        }
        self.persist_pending = false;
        self.persist_due_ms = None;
        let camera = self.camera;
        if let Some(persistence) = self.persistence.as_mut() {
            trace!(?camera, "saving camera");
            persistence.save_camera(camera);
        }
    }
}
