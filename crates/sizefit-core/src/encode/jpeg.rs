//! JPEG encoding via the `image` crate.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::validate_rgb;
use super::{EncodeError, EncodeFormat};

/// Map a normalized quality in `(0, 1)` onto the JPEG scale `1..=100`.
///
/// Out-of-range and NaN inputs clamp to the nearest valid setting.
pub fn jpeg_quality(quality: f64) -> u8 {
    if quality.is_nan() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100); values outside are clamped
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_rgb(pixels, width, height)?;

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: EncodeFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width) as u8);
                pixels.push((y * 255 / height) as u8);
                pixels.push(((x + y) * 127 / (width + height)) as u8);
            }
        }
        pixels
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.5), 50);
        assert_eq!(jpeg_quality(0.95), 95);
        assert_eq!(jpeg_quality(0.05), 5);
        assert_eq!(jpeg_quality(0.001), 1);
        assert_eq!(jpeg_quality(1.7), 100);
        assert_eq!(jpeg_quality(-0.3), 1);
        assert_eq!(jpeg_quality(f64::NAN), 1);
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg = encode_jpeg(&[128u8; 100 * 100 * 3], 100, 100, 90).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        let pixels = gradient(64, 64);

        let low_q = encode_jpeg(&pixels, 64, 64, 10).unwrap();
        let high_q = encode_jpeg(&pixels, 64, 64, 95).unwrap();

        assert!(high_q.len() > low_q.len());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let result = encode_jpeg(&[128u8; 99 * 100 * 3], 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let result = encode_jpeg(&[], 0, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }
}
