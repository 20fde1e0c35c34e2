//! Target dimension planning.

use serde::{Deserialize, Serialize};

/// Output of [`plan_dimensions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionPlan {
    pub width: u32,
    pub height: u32,
    /// Whether the planner chose new dimensions.
    pub resized: bool,
}

/// Compute the target size for a source image.
///
/// The dominant axis decides which cap applies: `max_width` when the source
/// is at least as wide as it is tall, `max_height` otherwise. A resize is
/// planned when the dominant side exceeds its cap, or unconditionally when
/// `upscale` is set. The other side follows the source aspect ratio, rounded
/// to the nearest pixel.
///
/// With `resize` disabled the source dimensions come back unchanged.
///
/// # Example
///
/// ```
/// use downsize_core::transform::plan_dimensions;
///
/// let plan = plan_dimensions(4000, 3000, 500, 500, true, false);
/// assert_eq!((plan.width, plan.height, plan.resized), (500, 375, true));
/// ```
pub fn plan_dimensions(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
    resize: bool,
    upscale: bool,
) -> DimensionPlan {
    let unchanged = DimensionPlan {
        width: source_width,
        height: source_height,
        resized: false,
    };

    if !resize || source_width == 0 || source_height == 0 {
        return unchanged;
    }

    if source_width >= source_height {
        if source_width > max_width || upscale {
            let height = scale_side(source_height, max_width, source_width);
            return DimensionPlan {
                width: max_width.max(1),
                height,
                resized: true,
            };
        }
    } else if source_height > max_height || upscale {
        let width = scale_side(source_width, max_height, source_height);
        return DimensionPlan {
            width,
            height: max_height.max(1),
            resized: true,
        };
    }

    unchanged
}

/// `round(side * cap / dominant)`, never below one pixel.
fn scale_side(side: u32, cap: u32, dominant: u32) -> u32 {
    let scaled = (side as f64 * cap as f64 / dominant as f64).round() as u32;
    scaled.max(1)
}
