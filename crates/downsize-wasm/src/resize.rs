//! The `resizeImage` entry point.
//!
//! # Example
//!
//! ```typescript
//! import { resize_image } from '@downsize/wasm';
//!
//! input.addEventListener('change', async () => {
//!   const out = await resize_image(input.files[0], { maxWidth: 800, jpgQuality: 0.8 });
//!   upload(out);
//! });
//! ```

use crate::encode::{make_blob, make_file};
use crate::platform::{BrowserPlatform, ConsoleSink};
use downsize_core::decode::StandardDecoder;
use downsize_core::{Artifact, DiagnosticsSink, Pipeline, ResizeOptions, SourceFile};
use js_sys::{Function, Promise, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::File;

/// Parse options, falling back to the defaults when the object is malformed.
pub(crate) fn options_or_default(options: JsValue, sink: &dyn DiagnosticsSink) -> ResizeOptions {
    parse_options(options).unwrap_or_else(|e| {
        let reason = e.as_string().unwrap_or_else(|| format!("{:?}", e));
        sink.error(&format!("Invalid options, using defaults: {}", reason));
        ResizeOptions::default()
    })
}

/// Parse a JS options object. `undefined` or `null` means all defaults.
pub(crate) fn parse_options(options: JsValue) -> Result<ResizeOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ResizeOptions::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(JsValue::from)
}

async fn read_source(file: &File) -> Result<SourceFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    Ok(SourceFile {
        name: file.name(),
        mime_type: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
        last_modified: file.last_modified() as u64,
    })
}

/// Convert an artifact to its JS form. `Original` hands back the caller's file.
fn artifact_to_js(artifact: Artifact, original: &File) -> Result<JsValue, JsValue> {
    match artifact {
        Artifact::Original(_) => Ok(original.clone().into()),
        Artifact::File(file) => make_file(
            &file.bytes,
            &file.name,
            &file.mime_type,
            file.last_modified,
        )
        .map(JsValue::from),
        Artifact::Blob(blob) => make_blob(&blob.bytes, &blob.mime_type).map(JsValue::from),
    }
}

/// Run the pipeline on `file`, or hand it back when `ready` is false.
async fn resize_file(file: &File, options: JsValue, ready: bool) -> Result<JsValue, JsValue> {
    let sink = ConsoleSink;
    if !ready {
        sink.info("Browser can't read or encode files. Returning the original.");
        return Ok(file.clone().into());
    }

    let options = options_or_default(options, &sink);
    let source = read_source(file).await?;
    let platform = BrowserPlatform;
    let decoder = StandardDecoder;
    let artifact = Pipeline::new(&platform, &decoder, &sink)
        .run(source, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    artifact_to_js(artifact, file)
}

/// Resize and recompress a user-selected image file.
///
/// Resolves to a `File` (or a `Blob` when `returnFileObject` is false), or to
/// the untouched input when no work was needed or the runtime lacks what the
/// pipeline needs. A malformed options object is reported to the console and
/// replaced by the defaults. If `callback` is given it is called once with
/// the same value before the promise resolves.
///
/// # Errors
///
/// Rejects when the file cannot be read or decoded; the callback is not
/// called in that case.
#[wasm_bindgen]
pub fn resize_image(file: File, options: JsValue, callback: Option<Function>) -> Promise {
    future_to_promise(async move {
        let value = resize_file(&file, options, BrowserPlatform.can_process()).await?;
        if let Some(callback) = callback {
            callback.call1(&JsValue::NULL, &value)?;
        }
        Ok(value)
    })
}

/// Default options as a plain JS object.
#[wasm_bindgen]
pub fn default_options() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&ResizeOptions::default()).map_err(JsValue::from)
}
