//! Terminal failures of a compression request.

use enough::StopReason;
use thiserror::Error;

use crate::resize::ResizeError;

/// Why a compression request ended without a blob.
///
/// Missing the byte target is not listed here: an over-target blob is still
/// a result, reported through [`TargetStatus::Exhausted`].
///
/// [`TargetStatus::Exhausted`]: crate::controller::TargetStatus::Exhausted
#[derive(Debug, Error)]
pub enum CompressError {
    /// Every encode attempt of the request failed.
    #[error("Encoder produced no output after {attempts} attempts")]
    NoBlobProduced { attempts: u32 },

    /// The byte target must be positive.
    #[error("Target size must be greater than zero bytes")]
    InvalidTarget,

    #[error("Resize failed: {0}")]
    Resize(#[from] ResizeError),

    /// The caller abandoned the request.
    #[error("Compression cancelled: {0}")]
    Cancelled(StopReason),
}

impl From<StopReason> for CompressError {
    fn from(reason: StopReason) -> Self {
        Self::Cancelled(reason)
    }
}
