use tracing::{trace, warn};

use crate::core::{CanvasPoint, Cell, ClientRect, canvas_to_cell, to_canvas_local};
use crate::error::CanvasResult;
use crate::interaction::{
    GestureAction, GesturePhase, InteractionMode, MouseRelease, WheelAction, classify_wheel,
};
use crate::render::RenderDriver;

use super::{CanvasEngine, CanvasEvent};

impl<R: RenderDriver> CanvasEngine<R> {
    /// Sets the canvas bounding rect used to map client coordinates.
    pub fn set_client_rect(&mut self, rect: Option<ClientRect>) {
        self.client_rect = rect;
    }

    /// Maps client coordinates into canvas-local pixels.
    #[must_use]
    pub fn canvas_point(&self, client_x: f64, client_y: f64) -> CanvasPoint {
        to_canvas_local(client_x, client_y, self.client_rect)
    }

    /// Cell under a canvas-local point.
    #[must_use]
    pub fn cell_at(&self, point: CanvasPoint) -> Cell {
        canvas_to_cell(point, self.camera, self.config.cell_size)
    }

    pub fn mouse_down(&mut self, point: CanvasPoint) {
        self.cancel_camera_tasks();
        self.mouse.mouse_down(point);
        self.update_hover(point);
    }

    pub fn mouse_move(&mut self, point: CanvasPoint) -> CanvasResult<()> {
        self.update_hover(point);
        if let Some((dx, dy)) = self.mouse.mouse_move(point) {
            self.mode = InteractionMode::Panning;
            self.pan(dx, dy)?;
        }
        Ok(())
    }

    pub fn mouse_up(&mut self, point: CanvasPoint, now_ms: f64) -> CanvasResult<()> {
        match self.mouse.mouse_up(point) {
            MouseRelease::None => {}
            MouseRelease::Click { point } => {
                self.mode = InteractionMode::Idle;
                self.handle_tap(point, now_ms);
            }
            MouseRelease::DragEnd {
                velocity_x,
                velocity_y,
            } => {
                self.mode = InteractionMode::Idle;
                self.start_inertia(velocity_x, velocity_y)?;
                self.request_fetch(now_ms);
            }
        }
        Ok(())
    }

    /// Handles a touch-start with every active touch, canvas-local.
    pub fn touch_start(&mut self, touches: &[CanvasPoint]) {
        self.cancel_camera_tasks();
        self.gesture.touch_start(touches);
    }

    pub fn touch_move(&mut self, touches: &[CanvasPoint]) -> CanvasResult<()> {
        match self.gesture.touch_move(touches) {
            GestureAction::Pan { dx, dy } => {
                self.mode = InteractionMode::Panning;
                self.pan(dx, dy)?;
            }
            GestureAction::Pinch {
                center,
                distance_ratio,
            } => {
                self.mode = InteractionMode::Pinching;
                self.pinch(center, distance_ratio)?;
            }
            GestureAction::None | GestureAction::Tap { .. } | GestureAction::DragEnd { .. } => {}
        }
        Ok(())
    }

    /// Handles a touch-end. `remaining` lists touches still down and
    /// `released` is where the lifted finger left the screen.
    pub fn touch_end(
        &mut self,
        remaining: &[CanvasPoint],
        released: CanvasPoint,
        now_ms: f64,
    ) -> CanvasResult<()> {
        let action = self.gesture.touch_end(remaining, released, now_ms);
        if self.gesture.phase() == GesturePhase::Idle {
            self.mode = InteractionMode::Idle;
        }
        match action {
            GestureAction::Tap { point } => self.handle_tap(point, now_ms),
            GestureAction::DragEnd {
                velocity_x,
                velocity_y,
            } => {
                self.start_inertia(velocity_x, velocity_y)?;
                self.request_fetch(now_ms);
            }
            GestureAction::None if self.gesture.phase() == GesturePhase::Idle => {
                self.request_fetch(now_ms);
            }
            GestureAction::None | GestureAction::Pan { .. } | GestureAction::Pinch { .. } => {}
        }
        Ok(())
    }

    pub fn touch_cancel(&mut self) {
        self.gesture.cancel();
        if matches!(
            self.mode,
            InteractionMode::Panning | InteractionMode::Pinching
        ) {
            self.mode = InteractionMode::Idle;
        }
    }

    /// Handles a wheel event at a canvas-local point.
    ///
    /// With ctrl held the delta is a trackpad pinch; otherwise it scrolls.
    pub fn wheel(
        &mut self,
        point: CanvasPoint,
        delta_x: f64,
        delta_y: f64,
        ctrl_key: bool,
        now_ms: f64,
    ) -> CanvasResult<()> {
        self.cancel_camera_tasks();
        let action = classify_wheel(delta_x, delta_y, ctrl_key, self.config.wheel_zoom_sensitivity);
        trace!(?action, "wheel");
        match action {
            WheelAction::Zoom { factor, .. } => {
                self.zoom_about(point, factor)?;
            }
            WheelAction::Pan { dx, dy, .. } => {
                self.pan(dx, dy)?;
            }
        }
        self.update_hover(point);
        if action.settled() {
            self.request_fetch(now_ms);
        }
        Ok(())
    }

    pub(super) fn update_hover(&mut self, point: CanvasPoint) {
        let cell = self.cell_at(point);
        self.set_hover_cell(Some(cell));
    }

    pub(super) fn set_hover_cell(&mut self, cell: Option<Cell>) {
        if self.hover_cell == cell {
            return;
        }
        self.hover_cell = cell;
        if let Some(cell) = cell {
            self.emit_event(CanvasEvent::HoverCellChanged { cell });
        }
    }

    fn handle_tap(&mut self, point: CanvasPoint, now_ms: f64) {
        let cell = self.cell_at(point);
        self.emit_event(CanvasEvent::CellTapped { cell });
        if self.account.is_none() {
            warn!(cell = %cell, "tap without an attached account; not painting");
            return;
        }
        if let Err(err) = self.paint(cell, now_ms) {
            warn!(cell = %cell, error = %err, "paint on tap failed");
        }
    }
}
