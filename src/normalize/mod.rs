//! Attachment normalization.
//!
//! Converts raw uploaded artifacts into provider-agnostic [`ContentEnvelope`]s
//! within fixed size bounds, so provider adapters never see raw-artifact
//! concerns. Normalization is deterministic: identical input bytes always
//! produce an identical envelope.

mod image;
mod text;

pub use self::image::{MAX_IMAGE_DIMENSION, normalize_base64_image, normalize_image};
pub use self::text::{MAX_TEXT_BYTES, TRUNCATION_MARKER, normalize_text};

use crate::error::GatewayError;
use crate::types::AttachmentKind;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "json", "xml", "csv", "log"];
const STRUCTURED_TEXT_MIMES: &[&str] = &["application/json", "application/xml", "application/csv"];

/// Classify an artifact by declared MIME type and filename extension.
///
/// The image check runs first, then the text check; anything matching
/// neither is rejected.
pub fn classify(mime_type: &str, extension: Option<&str>) -> Result<AttachmentKind, GatewayError> {
    let ext = extension.unwrap_or("");

    if mime_type.starts_with("image/") || IMAGE_EXTENSIONS.contains(&ext) {
        return Ok(AttachmentKind::Image);
    }
    if mime_type.starts_with("text/")
        || STRUCTURED_TEXT_MIMES.contains(&mime_type)
        || TEXT_EXTENSIONS.contains(&ext)
    {
        return Ok(AttachmentKind::Text);
    }

    Err(GatewayError::UnsupportedAttachmentType(format!(
        "{} (.{})",
        if mime_type.is_empty() { "unknown" } else { mime_type },
        if ext.is_empty() { "?" } else { ext },
    )))
}
