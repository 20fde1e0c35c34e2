//! Pipeline options.
//!
//! Options deserialize with `#[serde(default)]`, so any subset of keys can be
//! supplied and the rest keep their defaults. Keys are camelCase to match the
//! JavaScript options object; unknown keys are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::Rgb;

/// A configuration value outside its documented range.
///
/// These are reported, never fatal: the pipeline carries on with the value
/// as given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Option jpgQuality must be between 0 and 1 (got {0})")]
    QualityOutOfRange(f32),

    #[error("Option sharpen must be between 0 and 1 (got {0})")]
    SharpenOutOfRange(f32),

    #[error("Option convertBgColor must be a hex colour like #ffffff (got '{0}')")]
    InvalidBackgroundColor(String),
}

/// Options for one resize call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    /// Cap on the width of landscape (and square) images, in pixels.
    pub max_width: u32,
    /// Cap on the height of portrait images, in pixels.
    pub max_height: u32,
    /// Set to false to only re-encode at `jpg_quality`.
    pub resize: bool,
    /// Sharpening mix factor applied after a resize (0 disables).
    pub sharpen: f32,
    /// JPEG quality, 0 to 1.
    pub jpg_quality: f32,
    /// Flatten transparency onto `convert_bg_color` instead of black.
    pub convert_format: bool,
    pub convert_bg_color: String,
    /// Return a named file when the platform supports it, otherwise a blob.
    pub return_file_object: bool,
    /// Enlarge images smaller than the caps.
    pub upscale: bool,
    /// Route diagnostics to the sink.
    pub debug: bool,
    /// Rename to `name_resized_compressed.jpg` style names.
    pub rename_file: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 500,
            max_height: 500,
            resize: true,
            sharpen: 0.15,
            jpg_quality: 0.9,
            convert_format: false,
            convert_bg_color: "#ffffff".to_string(),
            return_file_object: true,
            upscale: false,
            debug: false,
            rename_file: true,
        }
    }
}

impl ResizeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every out-of-range value.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        if !(0.0..=1.0).contains(&self.jpg_quality) {
            problems.push(ConfigError::QualityOutOfRange(self.jpg_quality));
        }
        if !(0.0..=1.0).contains(&self.sharpen) {
            problems.push(ConfigError::SharpenOutOfRange(self.sharpen));
        }
        if self.convert_format && Rgb::from_hex(&self.convert_bg_color).is_none() {
            problems.push(ConfigError::InvalidBackgroundColor(
                self.convert_bg_color.clone(),
            ));
        }
        problems
    }

    /// Colour that transparent pixels are composited onto before encoding.
    ///
    /// Black unless `convert_format` is set; an unparseable colour falls back
    /// to white.
    pub fn background(&self) -> Rgb {
        if self.convert_format {
            Rgb::from_hex(&self.convert_bg_color).unwrap_or(Rgb::WHITE)
        } else {
            Rgb::BLACK
        }
    }

    /// Whether re-encoding changes quality.
    pub fn compresses(&self) -> bool {
        self.jpg_quality != 1.0
    }
}
