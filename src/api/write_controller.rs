use tracing::debug;

use crate::core::{Cell, Color};
use crate::error::{CanvasError, CanvasResult, RemoteError};
use crate::render::RenderDriver;
use crate::write::{PaintRequest, PendingWrite, Receipt, TransactionId, WriteOutcome};

use super::{CanvasEngine, CanvasEvent, RemoteCommand};

impl<R: RenderDriver> CanvasEngine<R> {
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Attaches (or detaches, with `None`) the account taps paint with.
    pub fn set_account(&mut self, account: Option<String>) {
        debug!(attached = account.is_some(), "account changed");
        self.account = account;
    }

    #[must_use]
    pub fn paint_color(&self) -> Color {
        self.paint_color
    }

    pub fn set_paint_color(&mut self, color: Color) {
        self.paint_color = color;
    }

    #[must_use]
    pub fn pending_write(&self, transaction_id: TransactionId) -> Option<&PendingWrite> {
        self.writes.pending(transaction_id)
    }

    #[must_use]
    pub fn pending_write_count(&self) -> usize {
        self.writes.pending_count()
    }

    /// Optimistically paints `cell` with the selected color and queues the
    /// submission as [`RemoteCommand::Paint`].
    pub fn paint(&mut self, cell: Cell, now_ms: f64) -> CanvasResult<PaintRequest> {
        self.paint_with(cell, self.paint_color, now_ms)
    }

    pub fn paint_with(&mut self, cell: Cell, color: Color, now_ms: f64) -> CanvasResult<PaintRequest> {
        let Some(account) = self.account.as_deref() else {
            return Err(CanvasError::InvalidData(
                "cannot paint without an attached account".to_owned(),
            ));
        };
        let request = self
            .writes
            .issue(&mut self.cache, account, cell, color, now_ms);
        self.commands.push(RemoteCommand::Paint(request.clone()));
        self.emit_event(CanvasEvent::PaintIssued {
            transaction_id: request.transaction_id,
            cell,
            color,
        });
        Ok(request)
    }

    /// Reports the result of a [`RemoteCommand::Paint`].
    pub fn complete_paint(
        &mut self,
        transaction_id: TransactionId,
        result: Result<Receipt, RemoteError>,
        now_ms: f64,
    ) -> CanvasResult<WriteOutcome> {
        let outcome = self
            .writes
            .complete(&mut self.cache, transaction_id, result, now_ms)?;
        match &outcome {
            WriteOutcome::Confirmed {
                transaction_id,
                cell,
            } => self.emit_event(CanvasEvent::PaintConfirmed {
                transaction_id: *transaction_id,
                cell: *cell,
            }),
            WriteOutcome::AwaitingReflection { .. } => {}
            WriteOutcome::RolledBack {
                transaction_id,
                cell,
                message,
                ..
            } => self.emit_event(CanvasEvent::PaintReverted {
                transaction_id: *transaction_id,
                cell: *cell,
                message: (*message).to_owned(),
            }),
        }
        Ok(outcome)
    }

    /// Confirms writes whose reflection wait has timed out.
    pub(super) fn expire_writes(&mut self, now_ms: f64) {
        let expired = self.writes.expire(&mut self.cache, now_ms);
        for (transaction_id, cell) in expired {
            self.emit_event(CanvasEvent::PaintConfirmed {
                transaction_id,
                cell,
            });
        }
    }
}
