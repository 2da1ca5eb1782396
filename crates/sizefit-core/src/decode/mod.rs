//! Image decoding for compression requests.
//!
//! Turns uploaded file bytes (JPEG or PNG) into an RGB8 [`PixelBuffer`],
//! applying EXIF orientation so the compressed output is displayed upright.
//!
//! [`PixelBuffer`]: crate::buffer::PixelBuffer

mod reader;
mod types;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, Orientation};
