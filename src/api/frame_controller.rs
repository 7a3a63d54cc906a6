use crate::error::{CanvasError, CanvasResult};
use crate::render::{RenderDriver, RenderFrame};

use super::CanvasEngine;

impl<R: RenderDriver> CanvasEngine<R> {
    /// Builds the frame for the current camera, with only the cached pixels
    /// inside the visible range.
    #[must_use]
    pub fn build_render_frame(&self) -> RenderFrame {
        let visible_range = self.visible_range();
        RenderFrame::new(self.canvas_size, self.camera, self.config.cell_size)
            .with_visible_range(visible_range)
            .with_pixels(self.cache.pixels_in(visible_range))
            .with_hover_cell(self.hover_cell)
    }

    pub fn render(&mut self) -> CanvasResult<()> {
        let frame = self.build_render_frame();
        self.renderer.render(&frame)
    }

    /// Runs one animation frame at `now_ms`.
    ///
    /// Order: jump animation, inertia, reflection timeouts, trailing fetch,
    /// debounced camera save, render.
    pub fn tick(&mut self, now_ms: f64) -> CanvasResult<()> {
        if !now_ms.is_finite() {
            return Err(CanvasError::InvalidData(
                "timestamp must be finite".to_owned(),
            ));
        }
        self.step_jump(now_ms);
        self.step_inertia()?;
        self.expire_writes(now_ms);
        if self.fetch_dirty {
            self.request_fetch(now_ms);
        }
        self.maybe_save_camera(now_ms);
        self.render()
    }
}
