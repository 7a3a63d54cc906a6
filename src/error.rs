use thiserror::Error;

use crate::write::TransactionId;

pub type CanvasResult<T> = Result<T, CanvasError>;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown or already resolved transaction: {0}")]
    UnknownTransaction(TransactionId),
}

/// Failure reported back by the host for a remote read, subscription or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The remote call did not answer in time.
    ///
    /// On the paint path this is non-fatal: the write is assumed to land.
    #[error("remote call timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("remote rejected the call: {0}")]
    Rejected(String),
}

impl RemoteError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Timeout => "timeout",
            Self::Network(detail) | Self::Rejected(detail) => detail,
        }
    }
}
