pub mod camera;
pub mod color;
pub mod pixel;
pub mod range;
pub mod transform;
pub mod types;

pub use camera::CameraState;
pub use color::Color;
pub use pixel::Pixel;
pub use range::{MAX_UINT32, PixelRange, ResultBudget, compute_visible_range};
pub use transform::{
    DEFAULT_CELL_SIZE, canvas_to_cell, cell_center, to_canvas, to_canvas_local, to_cell, to_world,
};
pub use types::{CanvasPoint, CanvasSize, Cell, ClientRect, WorldPoint};
