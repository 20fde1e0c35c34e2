//! Data-URL to raw bytes.
//!
//! Accepts both the `;base64,` form produced by canvas export and the older
//! percent-escaped form (`data:<mime>,<escaped bytes>`). Both yield the same
//! bytes for the same payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use percent_encoding::percent_decode_str;
use thiserror::Error;

pub(crate) const DATA_SCHEME: &str = "data:";
pub(crate) const BASE64_MARKER: &str = ";base64,";

/// Errors produced while parsing a data URL.
#[derive(Debug, Error)]
pub enum DataUrlError {
    /// The text does not start with `data:`.
    #[error("Not a data URL: missing 'data:' scheme")]
    MissingScheme,

    /// No comma separates the header from the payload.
    #[error("Malformed data URL: missing ',' before payload")]
    MissingPayload,

    /// The base64 payload could not be decoded.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Raw bytes recovered from a data URL plus the MIME type from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decode a data URL into its MIME type and raw bytes.
pub fn decode_data_url(text: &str) -> Result<DecodedBlob, DataUrlError> {
    let rest = text
        .strip_prefix(DATA_SCHEME)
        .ok_or(DataUrlError::MissingScheme)?;

    if let Some((mime_type, payload)) = rest.split_once(BASE64_MARKER) {
        let bytes = STANDARD.decode(payload.trim())?;
        return Ok(DecodedBlob {
            mime_type: mime_type.to_string(),
            bytes,
        });
    }

    let (mime_type, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
    let bytes: Vec<u8> = percent_decode_str(payload).collect();
    Ok(DecodedBlob {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
