//! Progressive downsampling.
//!
//! Scaling a large image to a small one in a single bilinear pass samples
//! only a few source pixels per output pixel and aliases badly. Instead the
//! image is halved repeatedly, keeping every pass close to a 0.5 scale factor,
//! and only the final pass lands on the exact target size.
//!
//! ```text
//! steps = ceil(log2(source_dominant / target_dominant))
//!
//! steps <= 1   source ───────────────────────────────▶ target
//! steps  > 1   source ─▶ 1/2 ─▶ 1/4 ─ … (steps-1 halvings) ─▶ target
//! ```

use image::{imageops, ImageBuffer, Rgba};

use super::TransformError;
use crate::decode::{FilterType, PixelBuffer, CHANNELS};

/// Number of scaling steps needed to go from `source_dominant` to
/// `target_dominant` along the dominant axis.
///
/// Returns 0 when no reduction is needed (equal sizes or upscaling).
///
/// # Example
///
/// ```
/// use downsize_core::transform::step_count;
///
/// assert_eq!(step_count(4096, 500), 4);
/// assert_eq!(step_count(1000, 500), 1);
/// ```
pub fn step_count(source_dominant: u32, target_dominant: u32) -> u32 {
    if source_dominant == 0 || target_dominant == 0 {
        return 0;
    }
    let ratio = source_dominant as f64 / target_dominant as f64;
    ratio.log2().ceil().max(0.0) as u32
}

/// Sizes of every scaling pass, in order. The last entry is always the target.
pub fn pass_sizes(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> Vec<(u32, u32)> {
    let (source_dominant, target_dominant) = if source_width >= source_height {
        (source_width, target_width)
    } else {
        (source_height, target_height)
    };
    let steps = step_count(source_dominant, target_dominant);

    let mut sizes = Vec::with_capacity(steps.max(1) as usize);
    if steps > 1 {
        let (mut width, mut height) = (source_width, source_height);
        for _ in 1..steps {
            width = (width / 2).max(1);
            height = (height / 2).max(1);
            sizes.push((width, height));
        }
    }
    sizes.push((target_width, target_height));
    sizes
}

/// Downsample with bilinear filtering. See [`downsample_with_filter`].
pub fn downsample(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
) -> Result<PixelBuffer, TransformError> {
    downsample_with_filter(source, target_width, target_height, FilterType::Bilinear)
}

/// Scale `source` to exactly `target_width` x `target_height`, going through
/// as many halving passes as [`pass_sizes`] prescribes.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` for a zero-sized target and
/// `TransformError::InvalidPixelData` when the source buffer length does not
/// match its dimensions.
pub fn downsample_with_filter(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    if target_width == 0 || target_height == 0 {
        return Err(TransformError::InvalidDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let passes = pass_sizes(source.width, source.height, target_width, target_height);
    log::debug!(
        "downsampling {}x{} -> {}x{} in {} pass(es)",
        source.width,
        source.height,
        target_width,
        target_height,
        passes.len()
    );

    let mut current: Option<PixelBuffer> = None;
    for (width, height) in passes {
        let input = current.as_ref().unwrap_or(source);
        current = Some(scale(input, width, height, filter)?);
    }

    // pass_sizes always yields at least the target pass
    current.ok_or(TransformError::InvalidDimensions {
        width: target_width,
        height: target_height,
    })
}

/// One scaling pass.
fn scale(
    source: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(
        source.width,
        source.height,
        source.pixels.as_slice(),
    )
    .ok_or(TransformError::InvalidPixelData {
        expected: source.width as usize * source.height as usize * CHANNELS,
        actual: source.pixels.len(),
    })?;

    if source.width == width && source.height == height {
        return Ok(source.clone());
    }

    let scaled = imageops::resize(&view, width, height, filter.to_image_filter());
    Ok(PixelBuffer::from_rgba_image(scaled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        PixelBuffer::new(width, height, pixels)
    }

    #[test]
    fn test_step_count_reference_case() {
        assert_eq!(step_count(4096, 500), 4);
    }

    #[test]
    fn test_step_count_exact_half_is_direct() {
        assert_eq!(step_count(1000, 500), 1);
    }

    #[test]
    fn test_step_count_just_over_half() {
        assert_eq!(step_count(1001, 500), 2);
    }

    #[test]
    fn test_step_count_powers_of_two() {
        assert_eq!(step_count(4000, 1000), 2);
        assert_eq!(step_count(8000, 1000), 3);
    }

    #[test]
    fn test_step_count_no_reduction() {
        assert_eq!(step_count(500, 500), 0);
        assert_eq!(step_count(100, 500), 0);
        assert_eq!(step_count(0, 500), 0);
    }

    #[test]
    fn test_pass_sizes_progressive() {
        let passes = pass_sizes(4096, 3072, 500, 375);
        assert_eq!(
            passes,
            vec![(2048, 1536), (1024, 768), (512, 384), (500, 375)]
        );
    }

    #[test]
    fn test_pass_sizes_portrait_uses_height() {
        let passes = pass_sizes(300, 2000, 75, 500);
        assert_eq!(passes, vec![(150, 1000), (75, 500)]);
    }

    #[test]
    fn test_pass_sizes_direct() {
        assert_eq!(pass_sizes(1000, 800, 500, 400), vec![(500, 400)]);
        assert_eq!(pass_sizes(100, 50, 500, 250), vec![(500, 250)]);
    }

    #[test]
    fn test_pass_sizes_halvings_never_undershoot_target() {
        let passes = pass_sizes(5000, 20, 300, 1);
        let (last_w, _) = passes[passes.len() - 2];
        assert!(last_w >= 300);
        assert!(passes.iter().all(|&(_, h)| h >= 1));
    }

    #[test]
    fn test_downsample_reaches_target() {
        let src = gradient(640, 480);
        let out = downsample(&src, 100, 75).unwrap();
        assert_eq!((out.width, out.height), (100, 75));
        assert_eq!(out.byte_size(), 100 * 75 * 4);
    }

    #[test]
    fn test_downsample_direct_path() {
        let src = gradient(200, 100);
        let out = downsample(&src, 100, 50).unwrap();
        assert_eq!((out.width, out.height), (100, 50));
    }

    #[test]
    fn test_downsample_upscale() {
        let src = gradient(10, 5);
        let out = downsample(&src, 40, 20).unwrap();
        assert_eq!((out.width, out.height), (40, 20));
    }

    #[test]
    fn test_downsample_same_size_is_identity() {
        let src = gradient(32, 16);
        assert_eq!(downsample(&src, 32, 16).unwrap(), src);
    }

    #[test]
    fn test_downsample_preserves_flat_color() {
        let src = PixelBuffer::filled(256, 128, [90, 160, 30, 255]);
        let out = downsample(&src, 20, 10).unwrap();
        for px in out.pixels.chunks_exact(4) {
            for (got, want) in px.iter().zip([90u8, 160, 30, 255]) {
                assert!((*got as i32 - want as i32).abs() <= 1, "{:?}", px);
            }
        }
    }

    #[test]
    fn test_all_filter_types() {
        let src = gradient(300, 100);
        for filter in [
            FilterType::Bilinear,
            FilterType::CatmullRom,
            FilterType::Lanczos3,
        ] {
            let out = downsample_with_filter(&src, 30, 10, filter).unwrap();
            assert_eq!((out.width, out.height), (30, 10));
        }
    }

    #[test]
    fn test_downsample_zero_target_error() {
        let src = gradient(10, 10);
        assert!(matches!(
            downsample(&src, 0, 5),
            Err(TransformError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_downsample_mismatched_buffer_error() {
        let src = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0u8; 7],
        };
        assert!(matches!(
            downsample(&src, 5, 5),
            Err(TransformError::InvalidPixelData { expected: 400, actual: 7 })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the step count is the smallest n with 2^n >= ratio.
        #[test]
        fn prop_step_count_is_minimal(
            source in 1u32..=20_000,
            target in 1u32..=5_000,
        ) {
            let steps = step_count(source, target);
            let ratio = source as f64 / target as f64;
            if ratio <= 1.0 {
                prop_assert_eq!(steps, 0);
            } else {
                prop_assert!(2f64.powi(steps as i32) >= ratio);
                prop_assert!(2f64.powi(steps as i32 - 1) < ratio);
            }
        }

        /// Property: the pass list ends on the target and has max(steps, 1) entries.
        #[test]
        fn prop_pass_sizes_shape(
            sw in 1u32..=8000,
            sh in 1u32..=8000,
            tw in 1u32..=1000,
            th in 1u32..=1000,
        ) {
            let passes = pass_sizes(sw, sh, tw, th);
            let dominant = if sw >= sh { (sw, tw) } else { (sh, th) };
            let steps = step_count(dominant.0, dominant.1);
            prop_assert_eq!(passes.len() as u32, steps.max(1));
            prop_assert_eq!(*passes.last().unwrap(), (tw, th));
        }
    }
}
