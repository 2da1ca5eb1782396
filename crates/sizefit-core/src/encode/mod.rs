//! Image encoding for size-targeted compression.
//!
//! This module provides:
//! - The [`Encoder`] capability the size search drives
//! - [`ImageCodec`], an encoder backed by the `image` crate (JPEG and PNG)
//! - [`EncodedBlob`], the encoded bytes plus the parameters that produced them
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::buffer::PixelBuffer;
//! use sizefit_core::encode::{EncodeFormat, Encoder, ImageCodec};
//!
//! let pixels = PixelBuffer::filled(100, 100, [128, 128, 128]);
//! let blob = ImageCodec.encode(&pixels, EncodeFormat::Jpeg, Some(0.8)).unwrap();
//! println!("Encoded {} bytes", blob.size());
//! ```

mod codec;
mod format;
mod jpeg;
mod png;
mod types;

pub use codec::{Encoder, ImageCodec};
pub use format::{EncodeFormat, FormatKind, UnsupportedFormat};
pub use jpeg::{encode_jpeg, jpeg_quality};
pub use png::encode_png;
pub use types::{EncodeError, EncodedBlob};
