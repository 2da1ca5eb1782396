//! Image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation};
use crate::buffer::PixelBuffer;

/// Decode a JPEG or PNG image from bytes, applying EXIF orientation.
///
/// The format is sniffed from the content, not from a file name. Alpha is
/// dropped; the result is always RGB8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for empty input or an unrecognized
/// format, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = get_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    Ok(PixelBuffer::from_rgb_image(oriented.into_rgb8()))
}

/// Read the EXIF orientation tag.
///
/// Returns `Orientation::Normal` if there is no EXIF data or no tag.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };

    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    fn png_bytes(width: u32, height: u32, pixels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(pixels, width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn two_pixel_image() -> DynamicImage {
        // Red (left), green (right)
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        DynamicImage::ImageRgb8(rgb)
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(3, 2, &[200u8; 3 * 2 * 3]);
        let buf = decode_image(&bytes).unwrap();

        assert_eq!(buf.dimensions(), (3, 2));
        assert_eq!(buf.pixels(), &[200u8; 18]);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(8, 8, &[10u8; 8 * 8 * 3]);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = png_bytes(1, 1, &[0, 0, 0]);
        assert_eq!(get_orientation(&bytes), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps() {
        let rotated = apply_orientation(two_pixel_image(), Orientation::Rotate90CW);
        assert_eq!(rotated.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let flipped =
            apply_orientation(two_pixel_image(), Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
