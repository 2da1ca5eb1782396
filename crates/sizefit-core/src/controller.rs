//! Size-targeted compression: quality search plus emergency downscaling.
//!
//! A request moves through these states:
//!
//! ```text
//! Init -> Resized -> Searching -> UnderTarget
//!                        |
//!                        v
//!                    OverTarget -> Shrinking -> Searching -> ... -> Exhausted
//! ```
//!
//! The source is first fitted to the requested maximum width and searched.
//! While the result is still over budget, the *current* buffer is shrunk by
//! [`SHRINK_FACTOR`] (so shrinking compounds) and searched again, for at
//! most [`MAX_SHRINK_ROUNDS`] rounds. Whatever the last successful round
//! produced is returned, over budget or not.
//!
//! Shrinking also stops once it can no longer change the dimensions, so a
//! buffer already at the 200 px floor gets fewer than four shrink rounds
//! even when every round misses the budget. Same-size retries are skipped.

use enough::{Stop, Unstoppable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::encode::{EncodeFormat, EncodedBlob, Encoder};
use crate::error::CompressError;
use crate::resize::{fit_to_width, shrink_dimensions, Resizer};
use crate::search::QualitySearch;

/// Smallest side, in pixels, that shrinking will produce. Also the smallest
/// accepted maximum width.
pub const MIN_DIMENSION: u32 = 200;
/// Maximum width used when the caller doesn't give one.
pub const DEFAULT_MAX_DIMENSION: u32 = 1200;
/// Per-round multiplier applied to both sides while over budget.
pub const SHRINK_FACTOR: f64 = 0.82;
/// Shrink rounds after the initial search.
pub const MAX_SHRINK_ROUNDS: u32 = 4;

/// What a single request is aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    target_bytes: u64,
    max_dimension: u32,
    format: EncodeFormat,
}

impl TargetSpec {
    /// Build a spec, raising `max_dimension` to [`MIN_DIMENSION`] if needed.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidTarget` if `target_bytes` is zero.
    pub fn new(
        target_bytes: u64,
        max_dimension: u32,
        format: EncodeFormat,
    ) -> Result<Self, CompressError> {
        if target_bytes == 0 {
            return Err(CompressError::InvalidTarget);
        }
        Ok(Self {
            target_bytes,
            max_dimension: max_dimension.max(MIN_DIMENSION),
            format,
        })
    }

    /// Same as [`TargetSpec::new`] with the target given in KiB.
    pub fn from_kb(
        target_kb: u64,
        max_dimension: u32,
        format: EncodeFormat,
    ) -> Result<Self, CompressError> {
        Self::new(target_kb.saturating_mul(1024), max_dimension, format)
    }

    pub fn target_bytes(&self) -> u64 {
        self.target_bytes
    }

    /// Target in KiB, rounded up so a byte target is never shown as smaller
    /// than it is. Exact for specs built with [`TargetSpec::from_kb`].
    pub fn target_kb(&self) -> u64 {
        self.target_bytes.div_ceil(1024)
    }

    /// Upper bound on the width of the first encoded round.
    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn format(&self) -> EncodeFormat {
        self.format
    }
}

/// How the emergency downscale loop shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrinkPolicy {
    pub factor: f64,
    pub max_rounds: u32,
    pub min_side: u32,
}

impl Default for ShrinkPolicy {
    fn default() -> Self {
        Self {
            factor: SHRINK_FACTOR,
            max_rounds: MAX_SHRINK_ROUNDS,
            min_side: MIN_DIMENSION,
        }
    }
}

/// Terminal state of a request that produced a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStatus {
    /// The returned blob fits the target.
    UnderTarget,
    /// Shrinking ran out; the returned blob is still over the target.
    Exhausted,
}

/// A finished request.
#[derive(Debug, Clone)]
pub struct CompressOutcome {
    pub blob: EncodedBlob,
    pub status: TargetStatus,
    /// Shrink rounds run after the initial search.
    pub shrink_rounds: u32,
    /// Encode calls across all rounds, including failed ones.
    pub encode_attempts: u32,
}

impl CompressOutcome {
    pub fn target_met(&self) -> bool {
        self.status == TargetStatus::UnderTarget
    }
}

/// Drives [`QualitySearch`] and the shrink loop for one request at a time.
///
/// Holds no per-request state, so one controller can serve any number of
/// requests, including concurrently if `E` and `R` are `Sync`.
#[derive(Debug, Clone)]
pub struct SizeTargetController<E, R> {
    encoder: E,
    resizer: R,
    search: QualitySearch,
    shrink: ShrinkPolicy,
}

impl<E, R> SizeTargetController<E, R>
where
    E: Encoder,
    R: Resizer,
{
    pub fn new(encoder: E, resizer: R) -> Self {
        Self {
            encoder,
            resizer,
            search: QualitySearch::default(),
            shrink: ShrinkPolicy::default(),
        }
    }

    pub fn with_search(mut self, search: QualitySearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_shrink_policy(mut self, shrink: ShrinkPolicy) -> Self {
        self.shrink = shrink;
        self
    }

    /// Compress `source` towards `spec`'s byte target.
    ///
    /// # Errors
    ///
    /// - `CompressError::NoBlobProduced` if the initial search produced nothing
    /// - `CompressError::Resize` if the resizer rejected a size
    pub fn compress(
        &self,
        source: &PixelBuffer,
        spec: &TargetSpec,
    ) -> Result<CompressOutcome, CompressError> {
        self.compress_with_stop(source, spec, &Unstoppable)
    }

    /// Like [`compress`](Self::compress), checking `stop` before every encode.
    ///
    /// A stopped request returns `CompressError::Cancelled` and drops any
    /// blob produced so far.
    pub fn compress_with_stop(
        &self,
        source: &PixelBuffer,
        spec: &TargetSpec,
        stop: &dyn Stop,
    ) -> Result<CompressOutcome, CompressError> {
        let target = spec.target_bytes();
        let format = spec.format();

        let (width, height) = fit_to_width(source.width(), source.height(), spec.max_dimension());
        let mut current = self.resizer.resize(source, width, height)?;
        debug!(
            source_width = source.width(),
            source_height = source.height(),
            width,
            height,
            "fitted source to max width"
        );

        let first = self
            .search
            .search(&self.encoder, &current, format, target, stop)?;
        let mut encode_attempts = first.attempts;
        let mut blob = first.blob;
        let mut shrink_rounds = 0;

        while !blob.fits(target) && shrink_rounds < self.shrink.max_rounds {
            let (width, height) = shrink_dimensions(
                current.width(),
                current.height(),
                self.shrink.factor,
                self.shrink.min_side,
            );
            if (width, height) == current.dimensions() {
                debug!(width, height, "cannot shrink further");
                break;
            }

            shrink_rounds += 1;
            current = self.resizer.resize(&current, width, height)?;
            debug!(
                round = shrink_rounds,
                width,
                height,
                previous_size = blob.size(),
                target,
                "over target, shrinking"
            );

            match self
                .search
                .search(&self.encoder, &current, format, target, stop)
            {
                Ok(next) => {
                    encode_attempts += next.attempts;
                    blob = next.blob;
                }
                Err(CompressError::NoBlobProduced { attempts }) => {
                    encode_attempts += attempts;
                    warn!(
                        round = shrink_rounds,
                        "shrink round produced no blob, keeping previous"
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        let status = if blob.fits(target) {
            TargetStatus::UnderTarget
        } else {
            TargetStatus::Exhausted
        };
        info!(
            size = blob.size(),
            target,
            width = blob.width(),
            height = blob.height(),
            quality = blob.quality(),
            shrink_rounds,
            ?status,
            "compression finished"
        );

        Ok(CompressOutcome {
            blob,
            status,
            shrink_rounds,
            encode_attempts,
        })
    }
}
