mod frame;
mod null_driver;

pub use frame::RenderFrame;
pub use null_driver::NullRenderDriver;

use crate::error::CanvasResult;

/// Contract implemented by any drawing backend.
///
/// Called once per animation frame with the camera and the merged pixel set.
/// Backends must accept frames without pixels.
pub trait RenderDriver {
    fn render(&mut self, frame: &RenderFrame) -> CanvasResult<()>;
}
