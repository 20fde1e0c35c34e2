//! 3x3 sharpening convolution with mix blending.
//!
//! Applied after downsampling to win back some of the edge contrast that the
//! bilinear passes smear out.
//!
//! ```text
//!  0 -1  0
//! -1  5 -1      out = convolved * mix + original * (1 - mix)
//!  0 -1  0
//! ```
//!
//! Neighbours outside the image are clamped to the nearest edge pixel, so
//! the kernel weights still sum to 1 at the borders and flat areas stay flat.

use super::TransformError;
use crate::decode::{PixelBuffer, CHANNELS};

/// Laplacian-based sharpen kernel, row-major.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Sharpen the R, G and B channels of `buffer`; alpha is copied as is.
///
/// All reads come from the unmodified input, so the result does not depend
/// on traversal order. A `mix` of `0.0`, or one that is not finite, hands
/// the buffer back untouched.
///
/// # Errors
///
/// Returns `TransformError::InvalidPixelData` if the buffer length does not
/// match its dimensions.
pub fn sharpen(buffer: PixelBuffer, mix: f32) -> Result<PixelBuffer, TransformError> {
    let expected = buffer.pixel_count() * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(TransformError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    if mix == 0.0 || !mix.is_finite() || buffer.is_empty() {
        return Ok(buffer);
    }

    let width = buffer.width as usize;
    let height = buffer.height as usize;
    let src = &buffer.pixels;
    let mut out = vec![0u8; src.len()];

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) * CHANNELS;
            let mut acc = [0.0f32; 3];

            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                let sy = (y + ky).saturating_sub(1).min(height - 1);
                for (kx, &weight) in row.iter().enumerate() {
                    if weight == 0.0 {
                        continue;
                    }
                    let sx = (x + kx).saturating_sub(1).min(width - 1);
                    let sidx = (sy * width + sx) * CHANNELS;
                    for (sum, &value) in acc.iter_mut().zip(&src[sidx..sidx + 3]) {
                        *sum += value as f32 * weight;
                    }
                }
            }

            for (c, convolved) in acc.into_iter().enumerate() {
                let original = src[idx + c] as f32;
                let blended = convolved * mix + original * (1.0 - mix);
                out[idx + c] = blended.round().clamp(0.0, 255.0) as u8;
            }
            out[idx + 3] = src[idx + 3];
        }
    }

    Ok(PixelBuffer::new(buffer.width, buffer.height, out))
}
