use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{Cell, Color, Pixel, PixelRange};
use crate::write::{CellPatch, TransactionId};

/// What happened to one remote pixel offered to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// The cell carries a pending optimistic write; the remote value is kept
    /// aside until that write resolves.
    Deferred,
    Unchanged,
}

/// Counters for a batch merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub applied: usize,
    pub deferred: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellLock {
    transaction: TransactionId,
    deferred_remote: Option<Color>,
}

/// Sparse store of known pixels keyed by cell.
///
/// Remote data overwrites by key (last write wins), except on cells locked by
/// a pending optimistic write: those keep the optimistic color until the
/// write is confirmed or reverted. Entries are never evicted.
#[derive(Debug, Clone, Default)]
pub struct PixelCache {
    pixels: IndexMap<Cell, Color>,
    locks: HashMap<Cell, CellLock>,
    revision: u64,
}

impl PixelCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Increments on every visible mutation; hosts compare it to detect change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<Color> {
        self.pixels.get(&cell).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.pixels
            .iter()
            .map(|(cell, color)| Pixel::new(*cell, *color))
    }

    /// Cached pixels inside `range`.
    ///
    /// Probes the range cell by cell when it is smaller than the cache,
    /// otherwise scans the cache.
    #[must_use]
    pub fn pixels_in(&self, range: PixelRange) -> Vec<Pixel> {
        if range.cell_count() < self.pixels.len() as u64 {
            range
                .cells()
                .filter_map(|cell| self.get(cell).map(|color| Pixel::new(cell, color)))
                .collect()
        } else {
            self.iter().filter(|pixel| range.contains(pixel.cell)).collect()
        }
    }

    #[must_use]
    pub fn locked_by(&self, cell: Cell) -> Option<TransactionId> {
        self.locks.get(&cell).map(|lock| lock.transaction)
    }

    /// Remote value parked behind the lock on `cell`, if any.
    #[must_use]
    pub fn deferred_remote(&self, cell: Cell) -> Option<Color> {
        self.locks.get(&cell).and_then(|lock| lock.deferred_remote)
    }

    pub fn merge_remote(&mut self, pixel: Pixel) -> MergeOutcome {
        if let Some(lock) = self.locks.get_mut(&pixel.cell) {
            trace!(cell = %pixel.cell, transaction = %lock.transaction, "remote pixel deferred behind optimistic write");
            lock.deferred_remote = Some(pixel.color);
            return MergeOutcome::Deferred;
        }
        self.write(pixel.cell, Some(pixel.color))
    }

    pub fn merge_remote_batch<I>(&mut self, pixels: I) -> MergeStats
    where
        I: IntoIterator<Item = Pixel>,
    {
        let mut stats = MergeStats::default();
        for pixel in pixels {
            match self.merge_remote(pixel) {
                MergeOutcome::Applied => stats.applied += 1,
                MergeOutcome::Deferred => stats.deferred += 1,
                MergeOutcome::Unchanged => stats.unchanged += 1,
            }
        }
        stats
    }

    /// Applies a single-cell patch, ignoring locks.
    pub fn apply_patch(&mut self, patch: CellPatch) -> MergeOutcome {
        self.write(patch.cell, patch.color)
    }

    /// Locks `cell` for `transaction`, taking over any previous lock.
    pub(crate) fn lock(&mut self, cell: Cell, transaction: TransactionId) {
        let deferred_remote = self
            .locks
            .get(&cell)
            .and_then(|lock| lock.deferred_remote);
        self.locks.insert(
            cell,
            CellLock {
                transaction,
                deferred_remote,
            },
        );
    }

    /// Releases the lock if `transaction` still owns it.
    ///
    /// Returns `Some(deferred_remote)` when released, `None` when another
    /// transaction owns the cell (or it was not locked).
    pub(crate) fn unlock(&mut self, cell: Cell, transaction: TransactionId) -> Option<Option<Color>> {
        match self.locks.get(&cell) {
            Some(lock) if lock.transaction == transaction => {
                self.locks.remove(&cell).map(|lock| lock.deferred_remote)
            }
            _ => None,
        }
    }

    /// Hands the lock on `cell` from `from` to `to`, keeping any parked
    /// remote value. Returns `false` when `from` does not own the lock.
    pub(crate) fn transfer_lock(&mut self, cell: Cell, from: TransactionId, to: TransactionId) -> bool {
        match self.locks.get_mut(&cell) {
            Some(lock) if lock.transaction == from => {
                lock.transaction = to;
                true
            }
            _ => false,
        }
    }

    fn write(&mut self, cell: Cell, color: Option<Color>) -> MergeOutcome {
        let changed = match color {
            Some(color) => self.pixels.insert(cell, color) != Some(color),
            None => self.pixels.shift_remove(&cell).is_some(),
        };
        if !changed {
            return MergeOutcome::Unchanged;
        }
        self.revision += 1;
        MergeOutcome::Applied
    }
}
