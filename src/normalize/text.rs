//! Text attachment normalization.

use crate::error::GatewayError;
use crate::types::{AttachmentKind, ContentEnvelope};

/// Ceiling for text content forwarded to a provider.
pub const MAX_TEXT_BYTES: usize = 50 * 1024;

/// Appended when text content is cut at [`MAX_TEXT_BYTES`].
pub const TRUNCATION_MARKER: &str = "\n... (content truncated)";

/// Decode text bytes as UTF-8 and cap them at [`MAX_TEXT_BYTES`].
///
/// Truncation lands on the nearest char boundary at or below the ceiling, so
/// multi-byte sequences are never split. `byte_size` records the original
/// decoded length, pre-truncation.
pub fn normalize_text(
    bytes: &[u8],
    mime_type: &str,
    filename: &str,
) -> Result<ContentEnvelope, GatewayError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| GatewayError::TextDecodeError(err.to_string()))?;

    let data = if text.len() > MAX_TEXT_BYTES {
        let mut cut = MAX_TEXT_BYTES;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
        truncated.push_str(&text[..cut]);
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        text.to_string()
    };

    Ok(ContentEnvelope {
        kind: AttachmentKind::Text,
        data,
        filename: filename.to_string(),
        byte_size: text.len() as u64,
        mime_type: mime_type.to_string(),
    })
}
