//! Output file naming.

use super::jpeg::JPEG_EXTENSION;

/// Derive the artifact's file name.
///
/// `photo.png` becomes `photo_resized.jpg`, `photo_compressed.jpg` or
/// `photo_resized_compressed.jpg` depending on what happened to it. With
/// `rename` off the original name is kept verbatim.
pub fn derive_file_name(original: &str, resized: bool, quality: f32, rename: bool) -> String {
    if !rename {
        return original.to_string();
    }

    let mut name = strip_extension(original).to_string();
    if resized {
        name.push_str("_resized");
    }
    if quality != 1.0 {
        name.push_str("_compressed");
    }
    name.push('.');
    name.push_str(JPEG_EXTENSION);
    name
}

/// Remove a trailing `.ext`, where `ext` is non-empty and holds no `/` or `.`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}
