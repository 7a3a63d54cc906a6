use crate::core::{CameraState, CanvasSize, Cell, Pixel, PixelRange};
use crate::error::{CanvasError, CanvasResult};

/// Everything a render driver needs for one animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub canvas_size: CanvasSize,
    pub camera: CameraState,
    pub cell_size: f64,
    pub visible_range: PixelRange,
    /// Known pixels inside `visible_range`, optimistic writes included.
    pub pixels: Vec<Pixel>,
    pub hover_cell: Option<Cell>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(canvas_size: CanvasSize, camera: CameraState, cell_size: f64) -> Self {
        Self {
            canvas_size,
            camera,
            cell_size,
            visible_range: PixelRange::default(),
            pixels: Vec::new(),
            hover_cell: None,
        }
    }

    #[must_use]
    pub fn with_visible_range(mut self, visible_range: PixelRange) -> Self {
        self.visible_range = visible_range;
        self
    }

    #[must_use]
    pub fn with_pixels(mut self, pixels: Vec<Pixel>) -> Self {
        self.pixels = pixels;
        self
    }

    #[must_use]
    pub fn with_hover_cell(mut self, hover_cell: Option<Cell>) -> Self {
        self.hover_cell = hover_cell;
        self
    }

    pub fn validate(&self) -> CanvasResult<()> {
        if !self.canvas_size.is_valid() {
            return Err(CanvasError::InvalidViewport {
                width: self.canvas_size.width,
                height: self.canvas_size.height,
            });
        }
        if !self.camera.is_finite() || self.camera.scale <= 0.0 {
            return Err(CanvasError::InvalidData(
                "frame camera must be finite with scale > 0".to_owned(),
            ));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CanvasError::InvalidData(
                "frame cell size must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Canvas-space rectangle `(x, y, size)` covered by `cell`.
    #[must_use]
    pub fn cell_rect(&self, cell: Cell) -> (f64, f64, f64) {
        let size = self.cell_size * self.camera.scale;
        (
            (cell.x as f64 * self.cell_size - self.camera.offset_x) * self.camera.scale,
            (cell.y as f64 * self.cell_size - self.camera.offset_y) * self.camera.scale,
            size,
        )
    }
}
