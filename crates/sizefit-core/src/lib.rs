//! Sizefit Core - size-targeted image compression
//!
//! This crate compresses a raster image so its encoded size lands at or
//! under a byte budget, trading quality first and resolution second.
//!
//! # Module Structure
//!
//! - `search` - Fixed-cost bisection over encoder quality
//! - `controller` - Initial fit, quality search and the emergency shrink loop
//! - `encode` - The encoder capability and an `image`-backed JPEG/PNG codec
//! - `resize` - The resizer capability and an `image`-backed implementation
//! - `decode` - Uploaded bytes to pixels, with EXIF orientation
//! - `report` - Savings, download naming and status text
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::{EncodeFormat, ImageCodec, ImageResizer, SizeTargetController, TargetSpec};
//!
//! let source = sizefit_core::decode::decode_image(&std::fs::read("photo.jpg")?)?;
//! let spec = TargetSpec::from_kb(50, 1200, EncodeFormat::Jpeg)?;
//! let outcome = SizeTargetController::new(ImageCodec, ImageResizer::default())
//!     .compress(&source, &spec)?;
//! println!("{} bytes, target met: {}", outcome.blob.size(), outcome.target_met());
//! ```

pub mod buffer;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod error;
pub mod report;
pub mod resize;
pub mod search;

pub use buffer::PixelBuffer;
pub use controller::{
    CompressOutcome, ShrinkPolicy, SizeTargetController, TargetSpec, TargetStatus,
    DEFAULT_MAX_DIMENSION, MAX_SHRINK_ROUNDS, MIN_DIMENSION, SHRINK_FACTOR,
};
pub use encode::{EncodeFormat, EncodedBlob, Encoder, ImageCodec};
pub use error::CompressError;
pub use report::CompressionReport;
pub use resize::{ImageResizer, Resizer};
pub use search::{
    QualitySearch, SearchBounds, SearchOutcome, QUALITY_CEILING, QUALITY_FLOOR,
    SEARCH_ITERATIONS,
};
pub use enough::{Stop, StopReason, Unstoppable};
