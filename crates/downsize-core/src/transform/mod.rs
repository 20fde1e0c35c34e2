//! Pixel transforms: dimension planning, progressive downsampling, sharpening.
//!
//! # Transform Order
//!
//! 1. [`plan_dimensions`] decides the target size
//! 2. [`downsample`] scales the source to that size in halving steps
//! 3. [`sharpen`] restores edge contrast lost while scaling
//!
//! Every stage works on an owned [`PixelBuffer`](crate::decode::PixelBuffer);
//! no stage keeps a reference to a buffer after handing it on.

mod downsample;
mod plan;
mod sharpen;

use thiserror::Error;

pub use downsample::{downsample, downsample_with_filter, pass_sizes, step_count};
pub use plan::{plan_dimensions, DimensionPlan};
pub use sharpen::{sharpen, SHARPEN_KERNEL};

/// Errors from pixel transforms.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the buffer dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}
