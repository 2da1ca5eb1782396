//! WASM-compatible wrapper types for image data.

use sizefit_core::PixelBuffer;
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// Pass it back into [`compress_pixels`](crate::compress_pixels) to compress
/// without copying the pixels through JavaScript.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a new JsPixelBuffer from dimensions and RGB pixel data.
    ///
    /// Returns an error if `pixels.length != width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            inner: PixelBuffer::new(width, height, pixels),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_buffer() {
        let img = JsPixelBuffer::from_buffer(PixelBuffer::filled(200, 100, [1, 2, 3]));
        assert_eq!(img.width(), 200);
        assert_eq!(img.height(), 100);
        assert_eq!(img.byte_length(), 60000);
        assert_eq!(&img.pixels()[0..3], &[1, 2, 3]);
    }

    #[test]
    fn test_buffer_is_shared_view() {
        let img = JsPixelBuffer::from_buffer(PixelBuffer::filled(2, 1, [9, 9, 9]));
        assert_eq!(img.buffer().dimensions(), (2, 1));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_validates_length() {
        assert!(JsPixelBuffer::new(2, 2, vec![0u8; 12]).is_ok());
        assert!(JsPixelBuffer::new(2, 2, vec![0u8; 11]).is_err());
    }
}
