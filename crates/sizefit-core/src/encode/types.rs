//! Encoded output and encoder errors.

use thiserror::Error;

use super::EncodeFormat;
use crate::buffer::PixelBuffer;

/// Errors from a single encode attempt.
///
/// The size search treats any of these as "no blob this attempt" and moves
/// on; they only surface to callers who drive an encoder directly.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec failed to produce output
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: EncodeFormat,
        message: String,
    },
}

/// Check that an RGB8 buffer is non-empty and consistent with its dimensions.
pub(crate) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = PixelBuffer::expected_len(width, height);
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// An encoded image and the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBlob {
    bytes: Vec<u8>,
    format: EncodeFormat,
    quality: Option<f64>,
    width: u32,
    height: u32,
}

impl EncodedBlob {
    pub fn new(
        bytes: Vec<u8>,
        format: EncodeFormat,
        quality: Option<f64>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            bytes,
            format,
            quality,
            width,
            height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn format(&self) -> EncodeFormat {
        self.format
    }

    /// Quality the encoder was asked for; `None` for lossless encodes.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn fits(&self, target_bytes: u64) -> bool {
        self.size() <= target_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_metadata() {
        let blob = EncodedBlob::new(vec![0u8; 42], EncodeFormat::Jpeg, Some(0.5), 30, 20);

        assert_eq!(blob.size(), 42);
        assert_eq!(blob.quality(), Some(0.5));
        assert_eq!(blob.dimensions(), (30, 20));
        assert!(blob.fits(42));
        assert!(!blob.fits(41));
    }

    #[test]
    fn test_validate_rgb() {
        assert!(validate_rgb(&[0u8; 12], 2, 2).is_ok());
        assert!(matches!(
            validate_rgb(&[0u8; 11], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 11
            })
        ));
        assert!(matches!(
            validate_rgb(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encoding_failed_display() {
        let err = EncodeError::EncodingFailed {
            format: EncodeFormat::Png,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "png encoding failed: boom");
    }
}
