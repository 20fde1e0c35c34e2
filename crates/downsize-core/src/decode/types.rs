//! Core types for image decoding and pixel storage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Error types for source image decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoder produced an image with a zero dimension.
    #[error("Decoded image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Filter type for scaling passes.
///
/// Every variant is bilinear or better; each halving pass stays near a 0.5
/// scale factor where these filters behave well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Bilinear interpolation (what a 2D canvas uses for `drawImage`).
    #[default]
    Bilinear,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    /// Lanczos3 interpolation (slowest, sharpest).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::CatmullRom => image::imageops::FilterType::CatmullRom,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An owned grid of interleaved RGBA8 pixels.
///
/// Stages hand the buffer to each other by value, so exactly one stage owns
/// it at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new PixelBuffer with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * CHANNELS).collect();
        Self::new(width, height, pixels)
    }

    /// Create a PixelBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert into an image::RgbaImage, consuming the buffer.
    ///
    /// Returns `None` when the pixel data does not match the dimensions.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// The larger of width and height.
    pub fn dominant_dimension(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// A decoded source image.
///
/// Immutable once loaded; both dimensions are at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    buffer: PixelBuffer,
}

impl SourceImage {
    /// Wrap a decoded buffer, rejecting zero-sized images.
    pub fn new(buffer: PixelBuffer) -> Result<Self, DecodeError> {
        if buffer.is_empty() {
            return Err(DecodeError::EmptyImage {
                width: buffer.width,
                height: buffer.height,
            });
        }
        Ok(Self { buffer })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Borrow the decoded pixels.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Give up the image, keeping its pixels.
    pub fn into_pixels(self) -> PixelBuffer {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::CatmullRom.to_image_filter(),
            image::imageops::FilterType::CatmullRom
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal); // Invalid defaults to Normal
    }

    #[test]
    fn test_pixel_buffer_creation() {
        let buf = PixelBuffer::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(buf.pixel_count(), 5000);
        assert_eq!(buf.byte_size(), 20000);
        assert_eq!(buf.dominant_dimension(), 100);
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_pixel_buffer_filled() {
        let buf = PixelBuffer::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(buf.byte_size(), 24);
        for px in buf.pixels.chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_pixel_buffer_rgba_image_roundtrip() {
        let buf = PixelBuffer::filled(4, 3, [1, 2, 3, 4]);
        let img = buf.clone().into_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(PixelBuffer::from_rgba_image(img), buf);
    }

    #[test]
    fn test_into_rgba_image_rejects_mismatch() {
        let buf = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(buf.into_rgba_image().is_none());
    }

    #[test]
    fn test_source_image_rejects_empty() {
        let result = SourceImage::new(PixelBuffer::new(0, 0, vec![]));
        assert!(matches!(
            result,
            Err(DecodeError::EmptyImage {
                width: 0,
                height: 0
            })
        ));
    }

    #[test]
    fn test_source_image_accessors() {
        let src = SourceImage::new(PixelBuffer::filled(7, 5, [0, 0, 0, 255])).unwrap();
        assert_eq!(src.width(), 7);
        assert_eq!(src.height(), 5);
        assert_eq!(src.pixels().byte_size(), 7 * 5 * 4);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::CorruptedFile("truncated".to_string());
        assert_eq!(err.to_string(), "Corrupted or incomplete image file: truncated");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
