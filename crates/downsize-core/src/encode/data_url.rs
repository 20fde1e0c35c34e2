//! Text form of an encoded image.
//!
//! A 2D canvas only hands back its contents as a data URL, and the pipeline
//! keeps that contract: the encoder yields a [`DataUrl`], which is rendered to
//! text and then decoded back into bytes by
//! [`decode_data_url`](crate::decode::decode_data_url).

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::{percent_encode, NON_ALPHANUMERIC};

use super::jpeg::{encode_jpeg, EncodeError, Rgb, JPEG_MIME};
use crate::decode::{PixelBuffer, BASE64_MARKER, DATA_SCHEME};

/// Which textual encoding to use for the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextForm {
    /// `data:<mime>;base64,<payload>`
    #[default]
    Base64,
    /// `data:<mime>,<percent-escaped payload>`
    Percent,
}

/// Encoded bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    mime_type: String,
    bytes: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render as a data URL string.
    pub fn to_text(&self, form: TextForm) -> String {
        match form {
            TextForm::Base64 => format!(
                "{DATA_SCHEME}{}{BASE64_MARKER}{}",
                self.mime_type,
                STANDARD.encode(&self.bytes)
            ),
            TextForm::Percent => format!(
                "{DATA_SCHEME}{},{}",
                self.mime_type,
                percent_encode(&self.bytes, NON_ALPHANUMERIC)
            ),
        }
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(TextForm::Base64))
    }
}

/// Encode a buffer as JPEG and wrap it as a data URL.
pub fn encode(buffer: &PixelBuffer, quality: f32, background: Rgb) -> Result<DataUrl, EncodeError> {
    let bytes = encode_jpeg(buffer, quality, background)?;
    Ok(DataUrl::new(JPEG_MIME, bytes))
}
