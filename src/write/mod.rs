mod coordinator;
mod error_message;
mod patch;

pub use coordinator::{
    PaintRequest, PendingWrite, Receipt, TransactionId, WriteConfig, WriteCoordinator,
    WriteOutcome, WritePhase,
};
pub use error_message::{GENERIC_WRITE_ERROR, humanize_write_error};
pub use patch::{CellPatch, PatchPair};
