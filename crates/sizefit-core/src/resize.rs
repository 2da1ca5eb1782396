//! Downscaling between compression rounds.
//!
//! The controller asks for two kinds of size change: the initial fit to the
//! requested maximum width, and the compounding emergency shrink when a
//! round still misses its byte budget. Both go through the [`Resizer`]
//! capability so the control loop can run against a stub.

use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Errors from a resize operation.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Invalid resize dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The source buffer's pixel data doesn't cover its dimensions.
    #[error("Source pixel buffer is inconsistent with {width}x{height}")]
    InvalidSource { width: u32, height: u32 },
}

/// Produces a new buffer at the requested dimensions.
///
/// Implementations must leave the source untouched and be deterministic.
/// Closures with the same signature are resizers.
pub trait Resizer {
    fn resize(
        &self,
        pixels: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, ResizeError>;
}

impl<F> Resizer for F
where
    F: Fn(&PixelBuffer, u32, u32) -> Result<PixelBuffer, ResizeError>,
{
    fn resize(
        &self,
        pixels: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, ResizeError> {
        self(pixels, width, height)
    }
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resizer backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageResizer {
    pub filter: FilterType,
}

impl ImageResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Resizer for ImageResizer {
    fn resize(
        &self,
        pixels: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, ResizeError> {
        if width == 0 || height == 0 {
            return Err(ResizeError::InvalidDimensions { width, height });
        }

        // Fast path: if dimensions match, just clone
        if pixels.dimensions() == (width, height) {
            return Ok(pixels.clone());
        }

        let source = pixels
            .as_rgb_image()
            .ok_or_else(|| ResizeError::InvalidSource {
                width: pixels.width(),
                height: pixels.height(),
            })?;

        let resized =
            image::imageops::resize(&source, width, height, self.filter.to_image_filter());
        Ok(PixelBuffer::from_rgb_image(resized))
    }
}

/// Dimensions after fitting `width` to at most `max_width`, keeping the
/// aspect ratio.
///
/// Never upscales. Each side is rounded to the nearest pixel and floored
/// at 1.
pub fn fit_to_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width == 0 {
        return (width, height);
    }

    let scale = (max_width as f64 / width as f64).min(1.0);
    (scale_side(width, scale, 1), scale_side(height, scale, 1))
}

/// Dimensions for one emergency shrink round.
///
/// Each side is multiplied by `factor` and rounded, then floored at
/// `min_side`. A side that was already below `min_side` comes back at
/// `min_side`.
pub fn shrink_dimensions(width: u32, height: u32, factor: f64, min_side: u32) -> (u32, u32) {
    (
        scale_side(width, factor, min_side),
        scale_side(height, factor, min_side),
    )
}

fn scale_side(side: u32, scale: f64, floor: u32) -> u32 {
    let scaled = (side as f64 * scale).round();
    (scaled as u32).max(floor)
}
