//! JPEG encoding of the final pixel buffer.
//!
//! JPEG has no alpha channel, so pixels are composited onto a solid
//! background first. Canvas export composites onto black; callers that
//! convert transparent formats usually want white, which is what
//! `convert_bg_color` is for.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;
use thiserror::Error;

use crate::decode::{PixelBuffer, CHANNELS};

/// MIME type of every encoded artifact.
pub const JPEG_MIME: &str = "image/jpeg";

/// File extension appended to renamed artifacts.
pub const JPEG_EXTENSION: &str = "jpg";

/// Encoder quality used when the requested quality is outside `[0, 1]`,
/// matching what browsers do for `canvas.toDataURL("image/jpeg", q)`.
pub const FALLBACK_QUALITY: f32 = 0.92;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// An opaque RGB colour used as the JPEG background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex colour: `#rrggbb` or `#rgb`, leading `#` optional.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }
}

/// Map a `[0, 1]` quality onto the encoder's `1..=100` scale.
///
/// Out-of-range and non-finite values use [`FALLBACK_QUALITY`].
pub fn quality_to_scale(quality: f32) -> u8 {
    let quality = if (0.0..=1.0).contains(&quality) {
        quality
    } else {
        FALLBACK_QUALITY
    };
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode an RGBA buffer to JPEG bytes.
///
/// # Arguments
///
/// * `buffer` - RGBA pixels to encode
/// * `quality` - Quality in `[0, 1]`, 1 being best
/// * `background` - Colour that transparent pixels are composited onto
///
/// # Example
///
/// ```
/// use downsize_core::decode::PixelBuffer;
/// use downsize_core::encode::{encode_jpeg, Rgb};
///
/// let buffer = PixelBuffer::filled(16, 16, [128, 128, 128, 255]);
/// let jpeg = encode_jpeg(&buffer, 0.9, Rgb::BLACK).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    buffer: &PixelBuffer,
    quality: f32,
    background: Rgb,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (buffer.width, buffer.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = buffer.pixel_count() * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let rgb = flatten(&buffer.pixels, background);

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality_to_scale(quality))
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}

/// Composite RGBA pixels onto an opaque background, producing RGB.
fn flatten(rgba: &[u8], background: Rgb) -> Vec<u8> {
    let bg = [background.r, background.g, background.b];
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for (&fg, &bg) in px[..3].iter().zip(&bg) {
            let value = (fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255;
            rgb.push(value as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_rgb(jpeg: &[u8]) -> image::RgbImage {
        image::load_from_memory_with_format(jpeg, image::ImageFormat::Jpeg)
            .unwrap()
            .into_rgb8()
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let buffer = PixelBuffer::filled(40, 30, [128, 128, 128, 255]);
        let jpeg = encode_jpeg(&buffer, 0.9, Rgb::BLACK).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_keeps_dimensions() {
        let buffer = PixelBuffer::filled(37, 11, [10, 200, 90, 255]);
        let jpeg = encode_jpeg(&buffer, 0.8, Rgb::BLACK).unwrap();
        assert_eq!(decode_rgb(&jpeg).dimensions(), (37, 11));
    }

    #[test]
    fn test_transparent_pixels_use_background() {
        let buffer = PixelBuffer::filled(16, 16, [255, 0, 0, 0]);

        let on_white = decode_rgb(&encode_jpeg(&buffer, 1.0, Rgb::WHITE).unwrap());
        let px = on_white.get_pixel(8, 8).0;
        assert!(px.iter().all(|&c| c > 245), "expected white, got {:?}", px);

        let on_black = decode_rgb(&encode_jpeg(&buffer, 1.0, Rgb::BLACK).unwrap());
        let px = on_black.get_pixel(8, 8).0;
        assert!(px.iter().all(|&c| c < 10), "expected black, got {:?}", px);
    }

    #[test]
    fn test_flatten_blends_partial_alpha() {
        let rgb = flatten(&[200, 100, 0, 128], Rgb::WHITE);
        // 200*128/255 + 255*127/255 ≈ 227
        assert_eq!(rgb, vec![227, 177, 127]);
    }

    #[test]
    fn test_flatten_opaque_is_exact() {
        assert_eq!(flatten(&[1, 2, 3, 255], Rgb::WHITE), vec![1, 2, 3]);
    }

    #[test]
    fn test_quality_to_scale() {
        assert_eq!(quality_to_scale(0.9), 90);
        assert_eq!(quality_to_scale(1.0), 100);
        assert_eq!(quality_to_scale(0.0), 1);
        assert_eq!(quality_to_scale(0.555), 56);
    }

    #[test]
    fn test_quality_out_of_range_falls_back() {
        assert_eq!(quality_to_scale(1.5), 92);
        assert_eq!(quality_to_scale(-0.1), 92);
        assert_eq!(quality_to_scale(f32::NAN), 92);
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let mut buffer = PixelBuffer::filled(64, 64, [0, 0, 0, 255]);
        for (i, px) in buffer.pixels.chunks_exact_mut(4).enumerate() {
            px[0] = (i * 7 % 256) as u8;
            px[1] = (i * 13 % 256) as u8;
            px[2] = (i % 64 * 4) as u8;
        }
        let low = encode_jpeg(&buffer, 0.1, Rgb::BLACK).unwrap();
        let high = encode_jpeg(&buffer, 1.0, Rgb::BLACK).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_encode_invalid_pixel_data() {
        let buffer = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0; 399],
        };
        assert!(matches!(
            encode_jpeg(&buffer, 0.9, Rgb::BLACK),
            Err(EncodeError::InvalidPixelData { expected: 400, actual: 399 })
        ));
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let buffer = PixelBuffer {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        assert!(matches!(
            encode_jpeg(&buffer, 0.9, Rgb::BLACK),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#ffffff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("000"), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_hex("#1a2B3c"), Some(Rgb::new(0x1a, 0x2b, 0x3c)));
        assert_eq!(Rgb::from_hex("#f80"), Some(Rgb::new(0xff, 0x88, 0x00)));
        assert_eq!(Rgb::from_hex("white"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
    }
}
