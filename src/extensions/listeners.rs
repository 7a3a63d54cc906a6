use serde::{Deserialize, Serialize};

use crate::core::{CameraState, Cell, Color};
use crate::interaction::InteractionMode;
use crate::write::TransactionId;

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasContext {
    pub camera: CameraState,
    pub interaction_mode: InteractionMode,
    pub hover_cell: Option<Cell>,
    pub pixel_count: usize,
    pub pending_writes: usize,
}

/// Event stream exposed to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasEvent {
    CameraChanged { camera: CameraState },
    HoverCellChanged { cell: Cell },
    CellTapped { cell: Cell },
    JumpFinished { cell: Cell },
    PixelsMerged { applied: usize, deferred: usize },
    PaintIssued {
        transaction_id: TransactionId,
        cell: Cell,
        color: Color,
    },
    PaintConfirmed {
        transaction_id: TransactionId,
        cell: Cell,
    },
    /// The user-facing failure report of the write path.
    PaintReverted {
        transaction_id: TransactionId,
        cell: Cell,
        message: String,
    },
}

/// Observer hook for host UI (toasts, sounds, coordinate readouts).
///
/// Listeners observe events and read engine context without mutating
/// engine internals.
pub trait CanvasListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &CanvasEvent, context: CanvasContext);
}
