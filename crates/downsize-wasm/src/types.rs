//! WASM-compatible wrapper types for pixel data.
//!
//! This module provides JavaScript-friendly types that wrap the core downsize
//! types, handling the conversion between Rust and JavaScript representations.

use downsize_core::decode::PixelBuffer;
use downsize_core::DimensionPlan;
use wasm_bindgen::prelude::*;

/// An RGBA pixel buffer for JavaScript.
///
/// The layout matches `ImageData.data`, so a buffer can be built straight
/// from `ctx.getImageData(...)` and written back with `putImageData`.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it into a
/// `Uint8Array`; wasm-bindgen's finalizer releases the WASM side.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a new JsPixelBuffer from dimensions and RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns an error if `pixels.length !== width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {} bytes (width * height * 4), got {}",
                expected,
                pixels.len()
            )));
        }
        Ok(JsPixelBuffer {
            width,
            height,
            pixels,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(buffer: PixelBuffer) -> Self {
        Self {
            width: buffer.width,
            height: buffer.height,
            pixels: buffer.pixels,
        }
    }

    /// Copy into a core PixelBuffer.
    pub(crate) fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer::new(self.width, self.height, self.pixels.clone())
    }
}

/// Planned target dimensions for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsDimensionPlan {
    width: u32,
    height: u32,
    resized: bool,
}

#[wasm_bindgen]
impl JsDimensionPlan {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the planner chose new dimensions.
    #[wasm_bindgen(getter)]
    pub fn resized(&self) -> bool {
        self.resized
    }
}

impl From<DimensionPlan> for JsDimensionPlan {
    fn from(plan: DimensionPlan) -> Self {
        Self {
            width: plan.width,
            height: plan.height,
            resized: plan.resized,
        }
    }
}
