//! Encoding for the downsize pipeline.
//!
//! This module provides functionality for:
//! - Encoding the final RGBA buffer to JPEG at a `[0, 1]` quality
//! - Rendering the encoded bytes as a data URL (base64 or percent-escaped)
//! - Deriving the output file name
//!
//! # Examples
//!
//! ```ignore
//! use downsize_core::decode::PixelBuffer;
//! use downsize_core::encode::{derive_file_name, encode, Rgb};
//!
//! let buffer = PixelBuffer::filled(100, 100, [128, 128, 128, 255]);
//! let url = encode(&buffer, 0.9, Rgb::BLACK).unwrap();
//! println!("{}", url);
//! assert_eq!(derive_file_name("gray.png", true, 0.9, true), "gray_resized_compressed.jpg");
//! ```

mod data_url;
mod jpeg;
mod naming;

pub use data_url::{encode, DataUrl, TextForm};
pub use jpeg::{
    encode_jpeg, quality_to_scale, EncodeError, Rgb, FALLBACK_QUALITY, JPEG_EXTENSION, JPEG_MIME,
};
pub use naming::derive_file_name;
