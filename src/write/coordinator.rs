use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::PixelCache;
use crate::core::{Cell, Color, Pixel};
use crate::error::{CanvasError, CanvasResult, RemoteError};

use super::{CellPatch, PatchPair, humanize_write_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(u64);

impl TransactionId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Tuning for the optimistic write path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriteConfig {
    /// After a successful submission, wait for the remote store to reflect
    /// the painted color before confirming.
    pub wait_for_reflection: bool,
    pub reflection_timeout_ms: f64,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            wait_for_reflection: true,
            reflection_timeout_ms: 10_000.0,
        }
    }
}

impl WriteConfig {
    pub fn validate(self) -> CanvasResult<Self> {
        if !self.reflection_timeout_ms.is_finite() || self.reflection_timeout_ms < 0.0 {
            return Err(CanvasError::InvalidData(
                "write reflection_timeout_ms must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Paint submission the host must send to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintRequest {
    pub transaction_id: TransactionId,
    pub account: String,
    pub cell: Cell,
    pub color: Color,
}

impl PaintRequest {
    /// Color in the store's packed `0xRRGGBBAA` form.
    #[must_use]
    pub fn packed_color(&self) -> u32 {
        self.color.to_packed()
    }
}

/// Receipt returned by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WritePhase {
    Submitting,
    AwaitingReflection { deadline_ms: f64 },
}

/// An issued paint that has not been confirmed or reverted yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub transaction_id: TransactionId,
    pub target: Cell,
    pub patches: PatchPair,
    pub issued_at_ms: f64,
    pub phase: WritePhase,
}

impl PendingWrite {
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.patches.forward.color
    }
}

/// Result of reporting a submission back to the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Confirmed {
        transaction_id: TransactionId,
        cell: Cell,
    },
    AwaitingReflection {
        transaction_id: TransactionId,
        deadline_ms: f64,
    },
    RolledBack {
        transaction_id: TransactionId,
        cell: Cell,
        error: RemoteError,
        message: &'static str,
    },
}

/// Owns pending optimistic writes and their inverse patches.
///
/// Each write moves `Issued -> Confirmed | RolledBack`. The forward patch is
/// applied to the cache at issue time and the cell is locked so remote data
/// cannot clobber it; confirmation keeps the painted color, rollback applies
/// the inverse (or the newest remote value parked behind the lock).
#[derive(Debug, Clone)]
pub struct WriteCoordinator {
    config: WriteConfig,
    next_id: u64,
    pending: IndexMap<TransactionId, PendingWrite>,
}

impl WriteCoordinator {
    #[must_use]
    pub fn new(config: WriteConfig) -> Self {
        Self {
            config,
            next_id: 0,
            pending: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> WriteConfig {
        self.config
    }

    #[must_use]
    pub fn pending(&self, transaction_id: TransactionId) -> Option<&PendingWrite> {
        self.pending.get(&transaction_id)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_writes(&self) -> impl Iterator<Item = &PendingWrite> {
        self.pending.values()
    }

    /// Paints `cell` locally and returns the submission for the host.
    pub fn issue(
        &mut self,
        cache: &mut PixelCache,
        account: &str,
        cell: Cell,
        color: Color,
        now_ms: f64,
    ) -> PaintRequest {
        self.next_id += 1;
        let transaction_id = TransactionId(self.next_id);

        // A still-pending write on the same cell shows an unconfirmed color;
        // roll back to what it would have restored instead.
        let before = match cache.locked_by(cell).and_then(|owner| self.pending.get(&owner)) {
            Some(previous) => previous.patches.inverse.color,
            None => cache.get(cell),
        };
        let patches = PatchPair::paint(cell, before, color);

        cache.apply_patch(patches.forward);
        cache.lock(cell, transaction_id);
        self.pending.insert(
            transaction_id,
            PendingWrite {
                transaction_id,
                target: cell,
                patches,
                issued_at_ms: now_ms,
                phase: WritePhase::Submitting,
            },
        );
        debug!(transaction = %transaction_id, cell = %cell, color = %color.to_hex(), "optimistic paint issued");

        PaintRequest {
            transaction_id,
            account: account.to_owned(),
            cell,
            color,
        }
    }

    /// Reports the remote submission result for `transaction_id`.
    pub fn complete(
        &mut self,
        cache: &mut PixelCache,
        transaction_id: TransactionId,
        result: Result<Receipt, RemoteError>,
        now_ms: f64,
    ) -> CanvasResult<WriteOutcome> {
        let Some(write) = self.pending.get(&transaction_id).copied() else {
            return Err(CanvasError::UnknownTransaction(transaction_id));
        };
        if write.phase != WritePhase::Submitting {
            return Err(CanvasError::InvalidData(format!(
                "transaction {transaction_id} was already submitted"
            )));
        }

        match result {
            Ok(receipt) => {
                debug!(transaction = %transaction_id, hash = %receipt.transaction_hash, "paint submitted");
                let reflected = write.color().is_some()
                    && cache.deferred_remote(write.target) == write.color();
                if !self.config.wait_for_reflection || reflected {
                    self.confirm(cache, transaction_id);
                    return Ok(WriteOutcome::Confirmed {
                        transaction_id,
                        cell: write.target,
                    });
                }
                let deadline_ms = now_ms + self.config.reflection_timeout_ms;
                if let Some(entry) = self.pending.get_mut(&transaction_id) {
                    entry.phase = WritePhase::AwaitingReflection { deadline_ms };
                }
                Ok(WriteOutcome::AwaitingReflection {
                    transaction_id,
                    deadline_ms,
                })
            }
            Err(RemoteError::Timeout) => {
                warn!(transaction = %transaction_id, "paint submission timed out; keeping optimistic value");
                self.confirm(cache, transaction_id);
                Ok(WriteOutcome::Confirmed {
                    transaction_id,
                    cell: write.target,
                })
            }
            Err(error) => {
                let message = humanize_write_error(&error);
                warn!(transaction = %transaction_id, error = %error, "paint submission failed; reverting");
                self.revert(cache, transaction_id);
                Ok(WriteOutcome::RolledBack {
                    transaction_id,
                    cell: write.target,
                    error,
                    message,
                })
            }
        }
    }

    /// Confirms writes awaiting reflection whose expected color just arrived.
    ///
    /// Must run before the pixel is merged into the cache.
    pub fn observe_remote(&mut self, cache: &mut PixelCache, pixel: Pixel) -> Option<TransactionId> {
        let reflected = self.pending.values().find(|write| {
            write.target == pixel.cell
                && write.color() == Some(pixel.color)
                && matches!(write.phase, WritePhase::AwaitingReflection { .. })
        })?;
        let transaction_id = reflected.transaction_id;
        debug!(transaction = %transaction_id, "paint reflected by remote store");
        self.confirm(cache, transaction_id);
        Some(transaction_id)
    }

    /// Confirms writes whose reflection deadline has passed.
    ///
    /// A missing reflection is not an error: the submission itself succeeded.
    pub fn expire(&mut self, cache: &mut PixelCache, now_ms: f64) -> Vec<(TransactionId, Cell)> {
        let expired: Vec<(TransactionId, Cell)> = self
            .pending
            .values()
            .filter(|write| {
                matches!(write.phase, WritePhase::AwaitingReflection { deadline_ms } if now_ms >= deadline_ms)
            })
            .map(|write| (write.transaction_id, write.target))
            .collect();
        for (transaction_id, _) in &expired {
            debug!(transaction = %transaction_id, "reflection wait timed out; confirming");
            self.confirm(cache, *transaction_id);
        }
        expired
    }

    fn confirm(&mut self, cache: &mut PixelCache, transaction_id: TransactionId) {
        let Some(write) = self.pending.shift_remove(&transaction_id) else {
            return;
        };
        cache.unlock(write.target, transaction_id);

        // Later writes on this cell now roll back to the confirmed color.
        for later in self
            .pending
            .values_mut()
            .filter(|later| later.target == write.target && later.transaction_id > transaction_id)
        {
            later.patches.inverse.color = write.color();
        }
        debug!(transaction = %transaction_id, cell = %write.target, "paint confirmed");
    }

    fn revert(&mut self, cache: &mut PixelCache, transaction_id: TransactionId) {
        let Some(write) = self.pending.shift_remove(&transaction_id) else {
            return;
        };

        // An older write on the same cell is still pending: show its color
        // again and let it own the cell.
        let previous = self
            .pending
            .values()
            .rev()
            .find(|other| other.target == write.target)
            .copied();
        if let Some(previous) = previous {
            if cache.transfer_lock(write.target, transaction_id, previous.transaction_id) {
                cache.apply_patch(previous.patches.forward);
                debug!(transaction = %transaction_id, cell = %write.target, "paint reverted to earlier pending write");
                return;
            }
        }

        match cache.unlock(write.target, transaction_id) {
            Some(Some(remote)) => {
                cache.apply_patch(CellPatch::set(write.target, remote));
            }
            Some(None) => {
                cache.apply_patch(write.patches.inverse);
            }
            // A newer write owns the cell and already restores to our baseline.
            None => {}
        }
        debug!(transaction = %transaction_id, cell = %write.target, "paint reverted");
    }
}
