//! WASM bindings for the individual pipeline stages.
//!
//! Exposes planning, downsampling and sharpening on their own so a page can
//! drive them step by step, e.g. to preview the effect of the sharpen mix.

use crate::types::{JsDimensionPlan, JsPixelBuffer};
use downsize_core::transform;
use wasm_bindgen::prelude::*;

/// Compute target dimensions for a source image.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const plan = plan_dimensions(4000, 3000, 500, 500, true, false);
/// // plan.width === 500, plan.height === 375, plan.resized === true
/// ```
#[wasm_bindgen]
pub fn plan_dimensions(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
    resize: bool,
    upscale: bool,
) -> JsDimensionPlan {
    transform::plan_dimensions(
        source_width,
        source_height,
        max_width,
        max_height,
        resize,
        upscale,
    )
    .into()
}

/// Number of scaling passes between two dominant-axis sizes.
#[wasm_bindgen]
pub fn step_count(source_dominant: u32, target_dominant: u32) -> u32 {
    transform::step_count(source_dominant, target_dominant)
}

/// Scale an image to exact dimensions through progressive halving passes.
///
/// # Errors
///
/// Returns an error if either target dimension is zero.
#[wasm_bindgen]
pub fn downsample(
    image: &JsPixelBuffer,
    target_width: u32,
    target_height: u32,
) -> Result<JsPixelBuffer, JsValue> {
    transform::downsample(&image.to_buffer(), target_width, target_height)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Apply the 3x3 sharpen kernel, blended with the original by `mix` (0 to 1).
///
/// # Example (TypeScript)
///
/// ```typescript
/// const data = ctx.getImageData(0, 0, w, h);
/// const sharp = sharpen(new JsPixelBuffer(w, h, data.data), 0.15);
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(sharp.pixels()), w, h), 0, 0);
/// ```
#[wasm_bindgen]
pub fn sharpen(image: &JsPixelBuffer, mix: f32) -> Result<JsPixelBuffer, JsValue> {
    transform::sharpen(image.to_buffer(), mix)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Tests for transform bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32, so these use
/// the infallible bindings and the core calls behind the fallible ones.
#[cfg(test)]
mod tests {
    use super::*;
    use downsize_core::decode::PixelBuffer;

    #[test]
    fn test_plan_dimensions_binding() {
        let plan = plan_dimensions(4000, 3000, 500, 500, true, false);
        assert_eq!(plan.width(), 500);
        assert_eq!(plan.height(), 375);
        assert!(plan.resized());
    }

    #[test]
    fn test_step_count_binding() {
        assert_eq!(step_count(4096, 500), 4);
    }

    #[test]
    fn test_sharpen_through_wrapper() {
        let img = JsPixelBuffer::from_buffer(PixelBuffer::filled(5, 5, [60, 70, 80, 255]));
        let out = transform::sharpen(img.to_buffer(), 1.0).unwrap();
        assert_eq!(out.pixels, img.pixels());
    }
}
