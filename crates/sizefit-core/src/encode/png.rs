//! PNG encoding via the `image` crate. Lossless, so there is no quality knob.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgb;
use super::{EncodeError, EncodeFormat};

/// Encode RGB pixel data to PNG bytes using the best compression level.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: EncodeFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer)
}
