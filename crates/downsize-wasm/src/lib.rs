//! Downsize WASM - WebAssembly bindings for the downsize pipeline
//!
//! This crate exposes downsize-core to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `resize` - The one-call `resize_image` entry point
//! - `transform` - Planning, downsampling and sharpening on their own
//! - `encode` - JPEG encoding and data URL conversion
//! - `platform` - Browser capability probing and console diagnostics
//! - `types` - WASM-compatible wrapper types for pixel data
//!
//! # Usage
//!
//! ```typescript
//! import init, { resize_image } from '@downsize/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const small = await resize_image(file, { maxWidth: 800, maxHeight: 800 });
//! console.log(`${file.size} -> ${small.size} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod platform;
mod resize;
mod transform;
mod types;

// Re-export public types
pub use encode::{data_url_to_blob, derive_file_name, encode_data_url, encode_jpeg};
pub use platform::{BrowserPlatform, ConsoleSink};
pub use resize::{default_options, resize_image};
pub use transform::{downsample, plan_dimensions, sharpen, step_count};
pub use types::{JsDimensionPlan, JsPixelBuffer};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
