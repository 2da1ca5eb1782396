//! The encoder capability used by the size search, and its `image` backend.

use super::{encode_jpeg, encode_png, jpeg_quality, EncodeError, EncodeFormat, EncodedBlob};
use crate::buffer::PixelBuffer;

/// Something that can turn pixels into an encoded blob.
///
/// `quality` is a normalized value in `(0, 1)`. Lossless formats are called
/// with `None` and must ignore any value they are given. An `Err` means the
/// attempt produced nothing; callers decide whether that is fatal.
///
/// Any `Fn(&PixelBuffer, EncodeFormat, Option<f64>) -> Result<EncodedBlob, EncodeError>`
/// is an encoder, which keeps test stubs to a single closure.
pub trait Encoder {
    fn encode(
        &self,
        pixels: &PixelBuffer,
        format: EncodeFormat,
        quality: Option<f64>,
    ) -> Result<EncodedBlob, EncodeError>;
}

impl<F> Encoder for F
where
    F: Fn(&PixelBuffer, EncodeFormat, Option<f64>) -> Result<EncodedBlob, EncodeError>,
{
    fn encode(
        &self,
        pixels: &PixelBuffer,
        format: EncodeFormat,
        quality: Option<f64>,
    ) -> Result<EncodedBlob, EncodeError> {
        self(pixels, format, quality)
    }
}

/// Encoder backed by the `image` crate's JPEG and PNG codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Encoder for ImageCodec {
    fn encode(
        &self,
        pixels: &PixelBuffer,
        format: EncodeFormat,
        quality: Option<f64>,
    ) -> Result<EncodedBlob, EncodeError> {
        let (width, height) = pixels.dimensions();
        match format {
            EncodeFormat::Jpeg => {
                // Unspecified quality gets the browser default of 0.92.
                let quality = quality.unwrap_or(0.92);
                let level = jpeg_quality(quality);
                let bytes = encode_jpeg(pixels.pixels(), width, height, level)?;
                Ok(EncodedBlob::new(bytes, format, Some(quality), width, height))
            }
            EncodeFormat::Png => {
                let bytes = encode_png(pixels.pixels(), width, height)?;
                Ok(EncodedBlob::new(bytes, format, None, width, height))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_codec_jpeg_records_quality() {
        let pixels = PixelBuffer::filled(16, 8, [90, 120, 200]);
        let blob = ImageCodec
            .encode(&pixels, EncodeFormat::Jpeg, Some(0.4))
            .unwrap();

        assert_eq!(blob.format(), EncodeFormat::Jpeg);
        assert_eq!(blob.quality(), Some(0.4));
        assert_eq!(blob.dimensions(), (16, 8));
        assert_eq!(&blob.bytes()[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_image_codec_png_ignores_quality() {
        let pixels = PixelBuffer::filled(16, 8, [90, 120, 200]);
        let with_quality = ImageCodec
            .encode(&pixels, EncodeFormat::Png, Some(0.1))
            .unwrap();
        let without = ImageCodec.encode(&pixels, EncodeFormat::Png, None).unwrap();

        assert_eq!(with_quality.quality(), None);
        assert_eq!(with_quality.bytes(), without.bytes());
    }

    #[test]
    fn test_image_codec_rejects_empty_buffer() {
        let pixels = PixelBuffer::new(0, 0, vec![]);
        let result = ImageCodec.encode(&pixels, EncodeFormat::Jpeg, Some(0.5));
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_closure_is_an_encoder() {
        let stub = |p: &PixelBuffer, f: EncodeFormat, q: Option<f64>| {
            Ok::<_, EncodeError>(EncodedBlob::new(vec![1, 2, 3], f, q, p.width(), p.height()))
        };
        let pixels = PixelBuffer::filled(2, 2, [0, 0, 0]);

        let blob = stub.encode(&pixels, EncodeFormat::Jpeg, Some(0.3)).unwrap();
        assert_eq!(blob.size(), 3);
    }
}
