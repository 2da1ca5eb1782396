//! Sizefit WASM - WebAssembly bindings for sizefit
//!
//! This crate exposes sizefit-core's size-targeted compression to
//! JavaScript/TypeScript pages. All calls are synchronous; run them from a
//! Web Worker to keep the page responsive.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for decoded pixels
//! - `compress` - Decode and compress bindings, plus the result type
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@sizefit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, 50, 1200, 'image/jpeg');
//! console.log(result.summary_line);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod types;

pub use compress::{compress_image, compress_pixels, decode_image, JsCompressResult};
pub use types::JsPixelBuffer;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
