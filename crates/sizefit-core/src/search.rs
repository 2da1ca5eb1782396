//! Bounded quality search for a byte budget.
//!
//! For a fixed pixel buffer, [`QualitySearch`] bisects the encoder's quality
//! parameter to find the richest setting whose output still fits the target.
//!
//! The search runs a fixed number of iterations instead of iterating to
//! convergence: every encode has real cost, so a request's total work is
//! bounded up front. The bracket keeps halving even once it is negligibly
//! narrow.
//!
//! # Result selection
//!
//! The blob returned is the one produced by the *last successful* encode,
//! whether or not it fits. After twelve halvings the final midpoint sits
//! next to the crossing point, so the most recent attempt is kept over the
//! history. Callers must check the size themselves.

use enough::Stop;
use tracing::{debug, warn};

use crate::buffer::PixelBuffer;
use crate::encode::{EncodeFormat, EncodedBlob, Encoder};
use crate::error::CompressError;

/// Lowest quality the search will try.
pub const QUALITY_FLOOR: f64 = 0.05;
/// Highest quality the search will try.
pub const QUALITY_CEILING: f64 = 0.95;
/// Encode calls per lossy search.
pub const SEARCH_ITERATIONS: u32 = 12;

/// The bisection bracket `[low, high]`.
///
/// Invariant: `0 < low <= high < 1`. Narrowing only ever moves one end
/// towards a midpoint, so the bracket never widens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    low: f64,
    high: f64,
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self {
            low: QUALITY_FLOOR,
            high: QUALITY_CEILING,
        }
    }
}

impl SearchBounds {
    /// Returns `None` unless `0 < low <= high < 1`.
    pub fn new(low: f64, high: f64) -> Option<Self> {
        (low > 0.0 && low <= high && high < 1.0).then_some(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// `quality` was over budget: search below it from now on.
    fn lower_high(&mut self, quality: f64) {
        debug_assert!(quality >= self.low && quality <= self.high);
        self.high = quality;
    }

    /// `quality` fit: search above it from now on.
    fn raise_low(&mut self, quality: f64) {
        debug_assert!(quality >= self.low && quality <= self.high);
        self.low = quality;
    }
}

/// Result of one [`QualitySearch::search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The last blob the encoder produced.
    pub blob: EncodedBlob,
    /// Bracket after the final iteration.
    pub bounds: SearchBounds,
    /// Encode calls made.
    pub attempts: u32,
    /// Encode calls that produced nothing.
    pub failed_attempts: u32,
}

/// Fixed-cost bisection over encoder quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySearch {
    bounds: SearchBounds,
    iterations: u32,
}

impl Default for QualitySearch {
    fn default() -> Self {
        Self {
            bounds: SearchBounds::default(),
            iterations: SEARCH_ITERATIONS,
        }
    }
}

impl QualitySearch {
    pub fn new(bounds: SearchBounds, iterations: u32) -> Self {
        Self { bounds, iterations }
    }

    pub fn bounds(&self) -> SearchBounds {
        self.bounds
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Find the richest quality whose encode fits `target_bytes`.
    ///
    /// Lossless formats get exactly one encode with no quality and its result
    /// as-is. Lossy formats get exactly `iterations` encodes.
    ///
    /// `stop` is checked before every encode call.
    ///
    /// # Errors
    ///
    /// - `CompressError::NoBlobProduced` if no encode call succeeded
    /// - `CompressError::Cancelled` if `stop` fired
    pub fn search<E>(
        &self,
        encoder: &E,
        pixels: &PixelBuffer,
        format: EncodeFormat,
        target_bytes: u64,
        stop: &dyn Stop,
    ) -> Result<SearchOutcome, CompressError>
    where
        E: Encoder + ?Sized,
    {
        if format.is_lossless() {
            return self.encode_once(encoder, pixels, format, stop);
        }

        let mut bounds = self.bounds;
        let mut best: Option<EncodedBlob> = None;
        let mut failed_attempts = 0;

        for iteration in 0..self.iterations {
            stop.check()?;

            let quality = bounds.midpoint();
            let blob = match encoder.encode(pixels, format, Some(quality)) {
                Ok(blob) => blob,
                Err(err) => {
                    warn!(
                        iteration,
                        quality,
                        error = %err,
                        "encode attempt produced no blob"
                    );
                    failed_attempts += 1;
                    continue;
                }
            };

            let over = blob.size() > target_bytes;
            debug!(
                iteration,
                quality,
                size = blob.size(),
                target_bytes,
                over,
                "quality probe"
            );
            if over {
                bounds.lower_high(quality);
            } else {
                bounds.raise_low(quality);
            }
            best = Some(blob);
        }

        match best {
            Some(blob) => Ok(SearchOutcome {
                blob,
                bounds,
                attempts: self.iterations,
                failed_attempts,
            }),
            None => Err(CompressError::NoBlobProduced {
                attempts: self.iterations,
            }),
        }
    }

    fn encode_once<E>(
        &self,
        encoder: &E,
        pixels: &PixelBuffer,
        format: EncodeFormat,
        stop: &dyn Stop,
    ) -> Result<SearchOutcome, CompressError>
    where
        E: Encoder + ?Sized,
    {
        stop.check()?;
        match encoder.encode(pixels, format, None) {
            Ok(blob) => {
                debug!(size = blob.size(), %format, "lossless encode, no quality search");
                Ok(SearchOutcome {
                    blob,
                    bounds: self.bounds,
                    attempts: 1,
                    failed_attempts: 0,
                })
            }
            Err(err) => {
                warn!(error = %err, %format, "lossless encode produced no blob");
                Err(CompressError::NoBlobProduced { attempts: 1 })
            }
        }
    }
}



#[cfg(test)]
mod proptests {
    use enough::Unstoppable;
    use proptest::prelude::*;

    use super::test_support::*;
    use super::*;

    proptest! {
        /// Property: with a monotone size curve the result lands within one
        /// bisection step of the crossing point.
        #[test]
        fn prop_converges_to_crossing(
            crossing in 0.06f64..0.94,
            scale in 1_000.0f64..1_000_000.0,
        ) {
            let target = (crossing * scale).round() as u64;
            let enc = encoder(|p, f, q| {
                let size = (q.unwrap_or(0.0) * scale).round() as u64;
                Ok(blob_of(size, p, f, q))
            });
            let pixels = PixelBuffer::filled(2, 2, [0, 0, 0]);

            let outcome = QualitySearch::default()
                .search(&enc, &pixels, EncodeFormat::Jpeg, target, &Unstoppable)
                .unwrap();

            let true_crossing = target as f64 / scale;
            let step = (QUALITY_CEILING - QUALITY_FLOOR) / 4096.0;
            let quality = outcome.blob.quality().unwrap();
            // Rounding the size to whole bytes can shift the crossing by
            // half a byte's worth of quality.
            let tolerance = step + 1.0 / scale;
            prop_assert!(
                (quality - true_crossing).abs() <= tolerance,
                "quality {} vs crossing {} (tolerance {})",
                quality,
                true_crossing,
                tolerance
            );
        }

        /// Property: the bracket never widens and stays inside (0, 1).
        #[test]
        fn prop_bounds_stay_valid(sizes in prop::collection::vec(0u64..2_000, 12)) {
            let calls = std::cell::Cell::new(0usize);
            let enc = encoder(|p, f, q| {
                let size = sizes[calls.get() % sizes.len()];
                calls.set(calls.get() + 1);
                Ok(blob_of(size, p, f, q))
            });
            let pixels = PixelBuffer::filled(2, 2, [0, 0, 0]);

            let outcome = QualitySearch::default()
                .search(&enc, &pixels, EncodeFormat::Jpeg, 1_000, &Unstoppable)
                .unwrap();

            prop_assert!(outcome.bounds.low() > 0.0);
            prop_assert!(outcome.bounds.high() < 1.0);
            prop_assert!(outcome.bounds.low() <= outcome.bounds.high());
            prop_assert!(outcome.bounds.low() >= QUALITY_FLOOR);
            prop_assert!(outcome.bounds.high() <= QUALITY_CEILING);
        }
    }
}
