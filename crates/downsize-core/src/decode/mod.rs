//! Decoding for the downsize pipeline.
//!
//! This module provides functionality for:
//! - Decoding the user's source file (JPEG, PNG, GIF, WebP, BMP) into RGBA pixels
//! - Applying EXIF orientation the way browsers do when drawing an image
//! - Turning the text form of an encoded image (a data URL) back into bytes
//!
//! # Examples
//!
//! ```ignore
//! use downsize_core::decode::{decode_data_url, decode_image};
//!
//! let source = decode_image(&std::fs::read("photo.png").unwrap()).unwrap();
//! println!("Decoded {}x{} image", source.width(), source.height());
//!
//! let blob = decode_data_url("data:image/jpeg;base64,/9j/2Q==").unwrap();
//! assert_eq!(blob.mime_type, "image/jpeg");
//! ```

mod data_url;
mod source;
mod types;

pub use data_url::{decode_data_url, DataUrlError, DecodedBlob};
pub(crate) use data_url::{BASE64_MARKER, DATA_SCHEME};
pub use source::{decode_image, ImageDecoder, StandardDecoder};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer, SourceImage, CHANNELS};
