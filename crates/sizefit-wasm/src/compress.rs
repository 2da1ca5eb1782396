//! Size-targeted compression WASM bindings.
//!
//! # Functions
//!
//! - [`compress_image`] - Decode uploaded bytes and compress to a target size
//! - [`compress_pixels`] - Compress an already decoded image
//! - [`decode_image`] - Decode uploaded bytes for preview or reuse
//!
//! # Example
//!
//! ```typescript
//! import { compress_image } from '@sizefit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, 20, 1200, 'image/jpeg');
//!
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! link.download = result.file_name;
//! status.textContent = result.status_message;
//! ```

use sizefit_core::decode;
use sizefit_core::report::{format_kb, CompressionReport};
use sizefit_core::{
    CompressOutcome, EncodeFormat, ImageCodec, ImageResizer, PixelBuffer, SizeTargetController,
    TargetSpec,
};
use wasm_bindgen::prelude::*;

use crate::types::JsPixelBuffer;

/// Result of a compression, with everything the page needs to show it.
#[wasm_bindgen]
pub struct JsCompressResult {
    bytes: Vec<u8>,
    report: CompressionReport,
}

#[wasm_bindgen]
impl JsCompressResult {
    /// Encoded bytes as a `Uint8Array`.
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.bytes.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.bytes.len() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.report.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.report.height
    }

    /// Quality used for the final encode, or `undefined` for PNG.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> Option<f64> {
        self.report.quality
    }

    #[wasm_bindgen(getter)]
    pub fn target_met(&self) -> bool {
        self.report.status == sizefit_core::TargetStatus::UnderTarget
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.report.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.report.mime_type.clone()
    }

    /// e.g. `compressed-20kb.jpg • 19.8 KB • saved 94.9%`
    #[wasm_bindgen(getter)]
    pub fn summary_line(&self) -> String {
        self.report.summary_line()
    }

    #[wasm_bindgen(getter)]
    pub fn status_message(&self) -> String {
        self.report.status_message()
    }

    /// Output size for the clipboard, e.g. `19.8 KB`.
    #[wasm_bindgen(getter)]
    pub fn size_label(&self) -> String {
        format!("{} KB", format_kb(self.bytes.len() as u64))
    }

    /// The full report as a plain JS object.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.report)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsCompressResult {
    fn new(outcome: CompressOutcome, spec: &TargetSpec, original_bytes: u64) -> Self {
        let report = CompressionReport::new(&outcome, spec, original_bytes);
        Self {
            bytes: outcome.blob.into_bytes(),
            report,
        }
    }
}

/// Decode uploaded JPEG or PNG bytes, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode uploaded bytes and compress them towards `target_kb`.
///
/// # Arguments
///
/// * `bytes` - The uploaded file (JPEG or PNG)
/// * `target_kb` - Size ceiling in KiB
/// * `max_width` - Width of the first attempt; values below 200 are raised to 200
/// * `format` - `image/jpeg`, `image/png`, `jpeg`, `jpg` or `png`
///
/// # Errors
///
/// Returns an error if the file can't be decoded, the format is unsupported,
/// `target_kb` is zero, or the encoder produced nothing at all.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    target_kb: u32,
    max_width: u32,
    format: &str,
) -> Result<JsCompressResult, JsValue> {
    let source =
        decode::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    run(&source, target_kb, max_width, format, bytes.len() as u64)
}

/// Compress an already decoded image towards `target_kb`.
///
/// `original_bytes` is the size of the file the pixels came from, used only
/// for the savings figure.
#[wasm_bindgen]
pub fn compress_pixels(
    image: &JsPixelBuffer,
    target_kb: u32,
    max_width: u32,
    format: &str,
    original_bytes: f64,
) -> Result<JsCompressResult, JsValue> {
    run(
        image.buffer(),
        target_kb,
        max_width,
        format,
        original_bytes.max(0.0) as u64,
    )
}

fn run(
    source: &PixelBuffer,
    target_kb: u32,
    max_width: u32,
    format: &str,
    original_bytes: u64,
) -> Result<JsCompressResult, JsValue> {
    let (spec, outcome) = compress_core(source, target_kb, max_width, format)?;
    let result = JsCompressResult::new(outcome, &spec, original_bytes);

    log(&format!(
        "{} ({})",
        result.report.summary_line(),
        result.report.status_message()
    ));
    Ok(result)
}

fn compress_core(
    source: &PixelBuffer,
    target_kb: u32,
    max_width: u32,
    format: &str,
) -> Result<(TargetSpec, CompressOutcome), String> {
    let format = format
        .parse::<EncodeFormat>()
        .map_err(|e| e.to_string())?;
    let spec = TargetSpec::from_kb(u64::from(target_kb), max_width, format)
        .map_err(|e| e.to_string())?;

    let outcome = SizeTargetController::new(ImageCodec, ImageResizer::default())
        .compress(source, &spec)
        .map_err(|e| e.to_string())?;
    Ok((spec, outcome))
}

#[cfg(target_arch = "wasm32")]
fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_message: &str) {}

/// Tests for compress bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32 targets, so
/// native tests go through `compress_core`.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_core_jpeg() {
        let source = PixelBuffer::filled(800, 600, [30, 60, 90]);
        let (spec, outcome) = compress_core(&source, 20, 400, "image/jpeg").unwrap();

        assert_eq!(spec.target_bytes(), 20 * 1024);
        assert_eq!(outcome.blob.dimensions(), (400, 300));
        assert!(outcome.target_met());
    }

    #[test]
    fn test_compress_core_png() {
        let source = PixelBuffer::filled(300, 300, [255, 255, 255]);
        let (_, outcome) = compress_core(&source, 100, 1200, "png").unwrap();

        assert_eq!(outcome.blob.quality(), None);
        assert_eq!(outcome.encode_attempts, 1);
    }

    #[test]
    fn test_compress_core_rejects_bad_input() {
        let source = PixelBuffer::filled(10, 10, [0, 0, 0]);

        let err = compress_core(&source, 20, 1200, "image/gif").unwrap_err();
        assert_eq!(err, "Unsupported output format: image/gif");

        let err = compress_core(&source, 0, 1200, "jpeg").unwrap_err();
        assert_eq!(err, "Target size must be greater than zero bytes");
    }

    #[test]
    fn test_result_report_fields() {
        let source = PixelBuffer::filled(640, 480, [200, 100, 50]);
        let (spec, outcome) = compress_core(&source, 50, 1200, "jpg").unwrap();
        let result = JsCompressResult::new(outcome, &spec, 500_000);

        assert_eq!(result.file_name(), "compressed-50kb.jpg");
        assert_eq!(result.mime_type(), "image/jpeg");
        assert!(result.target_met());
        assert_eq!(result.status_message(), "Done. Under target (50KB).");
        assert!(result.size_label().ends_with(" KB"));
    }
}
