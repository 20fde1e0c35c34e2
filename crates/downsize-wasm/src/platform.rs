//! Browser implementations of the pipeline's host traits.

use downsize_core::{DiagnosticsSink, Platform};
use js_sys::Reflect;
use wasm_bindgen::JsValue;

/// Capabilities probed from the JavaScript global object.
///
/// Pixel work happens inside WASM, so a drawing surface is always available.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPlatform;

impl BrowserPlatform {
    fn has_global(name: &str) -> bool {
        Reflect::has(&js_sys::global(), &JsValue::from_str(name)).unwrap_or(false)
    }

    /// Whether `Blob.prototype.arrayBuffer` exists, so a `File` can be read.
    pub fn supports_file_reading(&self) -> bool {
        Reflect::get(&js_sys::global(), &JsValue::from_str("Blob"))
            .and_then(|blob| Reflect::get(&blob, &JsValue::from_str("prototype")))
            .and_then(|proto| Reflect::has(&proto, &JsValue::from_str("arrayBuffer")))
            .unwrap_or(false)
    }

    /// Everything `resize_image` needs before it can touch the file.
    pub fn can_process(&self) -> bool {
        self.supports_binary_buffer_construction()
            && self.supports_2d_drawing_surface()
            && self.supports_file_reading()
    }
}

impl Platform for BrowserPlatform {
    fn supports_binary_buffer_construction(&self) -> bool {
        Self::has_global("Blob") && Self::has_global("Uint8Array")
    }

    fn supports_2d_drawing_surface(&self) -> bool {
        true
    }

    fn supports_named_file_objects(&self) -> bool {
        Self::has_global("File")
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Writes diagnostics to the browser console.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl DiagnosticsSink for ConsoleSink {
    fn info(&self, message: &str) {
        web_sys::console::log_1(&JsValue::from_str(message));
    }

    fn error(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
    }
}
