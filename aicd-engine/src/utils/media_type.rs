//! Upload sniffing
//!
//! Uploads are classified by magic bytes (via `infer`), never by a
//! client-supplied content type.

use crate::types::{MediaError, Modality};

/// Check that an upload is an image or audio as required
///
/// Returns the sniffed MIME type on success.
///
/// # Errors
/// `MediaError::Unsupported` when the bytes are unrecognised or of the other kind
pub fn ensure_media(bytes: &[u8], expected: Modality) -> Result<&'static str, MediaError> {
    let kind = infer::get(bytes).ok_or_else(|| {
        MediaError::Unsupported(format!("unrecognised {} upload", expected.as_str()))
    })?;

    let matches = match expected {
        Modality::Image => kind.matcher_type() == infer::MatcherType::Image,
        Modality::Audio => kind.matcher_type() == infer::MatcherType::Audio,
    };

    if matches {
        Ok(kind.mime_type())
    } else {
        Err(MediaError::Unsupported(format!(
            "expected {}, got {}",
            expected.as_str(),
            kind.mime_type()
        )))
    }
}
