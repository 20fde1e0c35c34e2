//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_jpeg`] - Encode an RGBA buffer to JPEG bytes
//! - [`encode_data_url`] - Encode an RGBA buffer to a JPEG data URL
//! - [`data_url_to_blob`] - Turn a data URL (base64 or percent-escaped) into a `Blob`
//! - [`derive_file_name`] - Name an output file the way the pipeline does
//!
//! # Example
//!
//! ```typescript
//! import { encode_data_url, data_url_to_blob } from '@downsize/wasm';
//!
//! const url = encode_data_url(buffer, 0.9, false);
//! const blob = data_url_to_blob(url);
//! ```

use crate::types::JsPixelBuffer;
use downsize_core::decode::decode_data_url;
use downsize_core::encode::{self, Rgb, TextForm};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, File, FilePropertyBag};

/// Parse an optional background colour, defaulting to black like canvas export.
fn background_from(color: Option<String>) -> Result<Rgb, JsValue> {
    match color {
        None => Ok(Rgb::BLACK),
        Some(hex) => Rgb::from_hex(&hex)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid background colour '{}'", hex))),
    }
}

/// Encode an RGBA buffer to JPEG bytes.
///
/// # Arguments
///
/// * `image` - RGBA pixels
/// * `quality` - JPEG quality from 0 to 1
/// * `background` - Optional `#rrggbb` colour for transparent pixels (black if omitted)
#[wasm_bindgen]
pub fn encode_jpeg(
    image: &JsPixelBuffer,
    quality: f32,
    background: Option<String>,
) -> Result<Vec<u8>, JsValue> {
    let background = background_from(background)?;
    encode::encode_jpeg(&image.to_buffer(), quality, background)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an RGBA buffer to a JPEG data URL.
///
/// `percent` selects the legacy percent-escaped form instead of base64.
#[wasm_bindgen]
pub fn encode_data_url(
    image: &JsPixelBuffer,
    quality: f32,
    percent: bool,
) -> Result<String, JsValue> {
    let form = if percent {
        TextForm::Percent
    } else {
        TextForm::Base64
    };
    encode::encode(&image.to_buffer(), quality, Rgb::BLACK)
        .map(|url| url.to_text(form))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a data URL into a `Blob` carrying the URL's MIME type.
///
/// # Example
///
/// ```typescript
/// const blob = data_url_to_blob(canvas.toDataURL('image/jpeg', 0.9));
/// ```
#[wasm_bindgen]
pub fn data_url_to_blob(data_url: &str) -> Result<Blob, JsValue> {
    let decoded = decode_data_url(data_url).map_err(|e| JsValue::from_str(&e.to_string()))?;
    make_blob(&decoded.bytes, &decoded.mime_type)
}

/// Output name for a file: `photo.png` → `photo_resized_compressed.jpg`.
#[wasm_bindgen]
pub fn derive_file_name(original: &str, resized: bool, quality: f32, rename: bool) -> String {
    encode::derive_file_name(original, resized, quality, rename)
}

fn byte_parts(bytes: &[u8]) -> Array {
    Array::of1(&Uint8Array::from(bytes))
}

pub(crate) fn make_blob(bytes: &[u8], mime_type: &str) -> Result<Blob, JsValue> {
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&byte_parts(bytes), &options)
}

pub(crate) fn make_file(
    bytes: &[u8],
    name: &str,
    mime_type: &str,
    last_modified: u64,
) -> Result<File, JsValue> {
    let options = FilePropertyBag::new();
    options.set_type(mime_type);
    options.set_last_modified(last_modified as f64);
    File::new_with_u8_array_sequence_and_options(&byte_parts(bytes), name, &options)
}
