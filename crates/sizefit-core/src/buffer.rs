//! Decoded pixel storage shared by the decoder, resizer and encoders.

/// Bytes per pixel for the RGB8 layout used throughout the pipeline.
pub const CHANNELS: usize = 3;

/// An immutable RGB8 pixel buffer.
///
/// Buffers are never mutated after construction. Every resize produces a new
/// buffer, so a compression request can hold on to the buffer of each round
/// without copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new PixelBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            Self::expected_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer of a single solid color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(Self::expected_len(width, height))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create a PixelBuffer from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Borrow the buffer as an image::RgbImage view for processing.
    ///
    /// Returns `None` if the pixel data does not cover the dimensions.
    pub fn as_rgb_image(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.pixels.as_slice())
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGB pixel data in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer and return the raw pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Check if this is an empty/invalid buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    pub(crate) fn expected_len(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * CHANNELS
    }
}
