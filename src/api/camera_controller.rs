use tracing::{debug, trace, warn};

use crate::core::{CameraState, CanvasPoint, CanvasSize, Cell};
use crate::error::{CanvasError, CanvasResult};
use crate::interaction::{InertiaState, InteractionMode, JumpAnimation};
use crate::render::RenderDriver;

use super::{CanvasEngine, CanvasEvent};

impl<R: RenderDriver> CanvasEngine<R> {
    /// Pans by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> CanvasResult<CameraState> {
        let next = self.limits.pan(self.camera, self.canvas_size, dx, dy)?;
        self.apply_camera(next);
        Ok(self.camera)
    }

    /// Zooms by `factor` keeping the world point under `anchor` fixed.
    pub fn zoom_about(&mut self, anchor: CanvasPoint, factor: f64) -> CanvasResult<CameraState> {
        let next = self
            .limits
            .zoom_about(self.camera, self.canvas_size, anchor, factor)?;
        self.apply_camera(next);
        Ok(self.camera)
    }

    pub fn pinch(&mut self, center: CanvasPoint, distance_ratio: f64) -> CanvasResult<CameraState> {
        let next = self
            .limits
            .pinch(self.camera, self.canvas_size, center, distance_ratio)?;
        self.apply_camera(next);
        Ok(self.camera)
    }

    /// Replaces the camera, clamped into bounds.
    pub fn set_camera(&mut self, camera: CameraState) -> CanvasResult<CameraState> {
        if !camera.is_finite() {
            return Err(CanvasError::InvalidData(
                "camera must be finite".to_owned(),
            ));
        }
        let next = self.limits.clamp(camera, self.canvas_size);
        self.apply_camera(next);
        Ok(self.camera)
    }

    /// Updates the canvas pixel size (e.g. after a host resize).
    pub fn set_canvas_size(&mut self, canvas_size: CanvasSize) -> CanvasResult<()> {
        if !canvas_size.is_valid() {
            return Err(CanvasError::InvalidViewport {
                width: canvas_size.width,
                height: canvas_size.height,
            });
        }
        self.canvas_size = canvas_size;
        self.config.canvas_size = canvas_size;
        let next = self.limits.clamp(self.camera, canvas_size);
        self.apply_camera(next);
        self.fetch_dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn inertia_state(&self) -> InertiaState {
        self.inertia
    }

    /// Starts inertial deceleration with a screen-space velocity per frame.
    pub fn start_inertia(&mut self, velocity_x: f64, velocity_y: f64) -> CanvasResult<()> {
        if !velocity_x.is_finite() || !velocity_y.is_finite() {
            return Err(CanvasError::InvalidData(
                "inertia velocity must be finite".to_owned(),
            ));
        }
        self.stop_inertia();
        if velocity_x.hypot(velocity_y) <= self.config.inertia.stop_threshold {
            return Ok(());
        }
        self.inertia.start(velocity_x, velocity_y);
        self.mode = InteractionMode::Inertia;
        trace!(velocity_x, velocity_y, "inertia started");
        Ok(())
    }

    pub fn stop_inertia(&mut self) {
        if self.inertia.active {
            self.inertia.stop();
            if self.mode == InteractionMode::Inertia {
                self.mode = InteractionMode::Idle;
            }
        }
    }

    #[must_use]
    pub fn jump_animation(&self) -> Option<JumpAnimation> {
        self.jump
    }

    /// Animates the camera so `cell` ends up centered, over the configured
    /// jump duration.
    pub fn animate_to(&mut self, cell: Cell, now_ms: f64) -> CanvasResult<()> {
        self.animate_to_with_duration(cell, self.config.jump_duration_ms, now_ms)
    }

    /// Same as [`CanvasEngine::animate_to`] with an explicit duration. A zero
    /// duration lands on the target immediately.
    pub fn animate_to_with_duration(
        &mut self,
        cell: Cell,
        duration_ms: f64,
        now_ms: f64,
    ) -> CanvasResult<()> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(CanvasError::InvalidData(
                "jump duration must be finite and >= 0".to_owned(),
            ));
        }
        if !now_ms.is_finite() {
            return Err(CanvasError::InvalidData(
                "timestamp must be finite".to_owned(),
            ));
        }

        self.cancel_camera_tasks();
        let target = self
            .limits
            .centered_on(self.camera, self.canvas_size, cell, self.config.cell_size);
        let animation = JumpAnimation::new(cell, self.camera, target, now_ms, duration_ms);
        debug!(cell = %cell, duration_ms, "jump animation started");
        self.jump = Some(animation);
        self.mode = InteractionMode::Jumping;

        if duration_ms == 0.0 {
            self.step_jump(now_ms);
        }
        Ok(())
    }

    pub fn cancel_animation(&mut self) {
        if self.jump.take().is_some() && self.mode == InteractionMode::Jumping {
            self.mode = InteractionMode::Idle;
        }
    }

    /// Advances the jump animation to `now_ms`.
    pub(super) fn step_jump(&mut self, now_ms: f64) {
        let Some(animation) = self.jump else {
            return;
        };
        let frame = animation.frame_at(now_ms);
        let next = CameraState {
            offset_x: frame.offset_x,
            offset_y: frame.offset_y,
            scale: self.camera.scale,
        };
        self.apply_camera(next);

        if frame.finished {
            self.jump = None;
            if self.mode == InteractionMode::Jumping {
                self.mode = InteractionMode::Idle;
            }
            let cell = animation.target_cell;
            debug!(cell = %cell, "jump animation finished");
            self.set_hover_cell(Some(cell));
            self.emit_event(CanvasEvent::JumpFinished { cell });
        }
    }

    /// Advances inertia by one frame.
    pub(super) fn step_inertia(&mut self) -> CanvasResult<()> {
        if !self.inertia.active {
            return Ok(());
        }
        match self.inertia.step(self.config.inertia) {
            Some((velocity_x, velocity_y)) => {
                match self
                    .limits
                    .pan(self.camera, self.canvas_size, velocity_x, velocity_y)
                {
                    Ok(next) => {
                        self.apply_camera(next);
                    }
                    Err(err) => {
                        warn!(error = %err, "inertia stopped");
                        self.stop_inertia();
                        return Err(err);
                    }
                }
            }
            None => {
                trace!("inertia settled");
                if self.mode == InteractionMode::Inertia {
                    self.mode = InteractionMode::Idle;
                }
            }
        }
        Ok(())
    }

    /// Cancels inertia and any running jump, e.g. when a new gesture begins.
    pub(super) fn cancel_camera_tasks(&mut self) {
        self.stop_inertia();
        self.cancel_animation();
    }

    /// Installs `next` as the camera. Returns `true` when it changed.
    pub(super) fn apply_camera(&mut self, next: CameraState) -> bool {
        if next == self.camera {
            return false;
        }
        self.camera = next;
        self.fetch_dirty = true;
        self.schedule_camera_save();
        self.emit_event(CanvasEvent::CameraChanged { camera: next });
        true
    }
}
