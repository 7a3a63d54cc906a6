use crate::core::CameraState;
use crate::error::CanvasResult;
use crate::render::{RenderDriver, RenderFrame};

/// No-op driver used by tests and headless engine usage.
///
/// It still validates frame content so tests catch invalid camera state
/// before a real backend is wired in.
#[derive(Debug, Default)]
pub struct NullRenderDriver {
    pub frames_rendered: usize,
    pub last_pixel_count: usize,
    pub last_camera: Option<CameraState>,
}

impl RenderDriver for NullRenderDriver {
    fn render(&mut self, frame: &RenderFrame) -> CanvasResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_pixel_count = frame.pixels.len();
        self.last_camera = Some(frame.camera);
        Ok(())
    }
}
