mod listeners;

pub use listeners::{CanvasContext, CanvasEvent, CanvasListener};
