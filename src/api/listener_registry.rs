use crate::error::{CanvasError, CanvasResult};
use crate::extensions::{CanvasContext, CanvasEvent, CanvasListener};
use crate::render::RenderDriver;

use super::CanvasEngine;

impl<R: RenderDriver> CanvasEngine<R> {
    /// Registers a listener with unique identifier.
    pub fn register_listener(&mut self, listener: Box<dyn CanvasListener>) -> CanvasResult<()> {
        let listener_id = listener.id().to_owned();
        if listener_id.is_empty() {
            return Err(CanvasError::InvalidData(
                "listener id must not be empty".to_owned(),
            ));
        }
        if self.has_listener(&listener_id) {
            return Err(CanvasError::InvalidData(format!(
                "listener with id `{listener_id}` is already registered"
            )));
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Unregisters a listener by id. Returns `true` when removed.
    pub fn unregister_listener(&mut self, listener_id: &str) -> bool {
        match self
            .listeners
            .iter()
            .position(|entry| entry.id() == listener_id)
        {
            Some(position) => {
                self.listeners.remove(position);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn has_listener(&self, listener_id: &str) -> bool {
        self.listeners
            .iter()
            .any(|listener| listener.id() == listener_id)
    }

    #[must_use]
    pub fn context(&self) -> CanvasContext {
        CanvasContext {
            camera: self.camera,
            interaction_mode: self.mode,
            hover_cell: self.hover_cell,
            pixel_count: self.cache.len(),
            pending_writes: self.writes.pending_count(),
        }
    }

    pub(super) fn emit_event(&mut self, event: CanvasEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let context = self.context();
        for listener in &mut self.listeners {
            listener.on_event(&event, context);
        }
    }
}
