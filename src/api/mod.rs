mod camera_controller;
mod engine;
mod engine_config;
mod fetch_controller;
mod frame_controller;
mod input_controller;
mod listener_registry;
mod persistence;
mod write_controller;

pub use engine::{CanvasEngine, RemoteCommand};
pub use engine_config::CanvasEngineConfig;
pub use persistence::CameraPersistence;

pub use crate::extensions::{CanvasContext, CanvasEvent, CanvasListener};
