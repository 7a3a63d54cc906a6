//! pixelaw-canvas: headless viewport and data engine for an infinite shared
//! pixel canvas.
//!
//! The crate owns the camera, input disambiguation, viewport range
//! calculation, the sparse pixel cache with its fetch scheduler, and the
//! optimistic write path. Hosts drive it with input events and timestamps,
//! carry out the [`api::RemoteCommand`]s it queues, and report results back.

pub mod api;
pub mod cache;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;
pub mod write;

pub use api::{CanvasEngine, CanvasEngineConfig, RemoteCommand};
pub use error::{CanvasError, CanvasResult, RemoteError};
