//! Image attachment normalization.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::GatewayError;
use crate::types::{AttachmentKind, ContentEnvelope};

/// Images are shrunk to fit within this square before re-encoding.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

const JPEG_QUALITY: u8 = 80;
const SCREENSHOT_FILENAME: &str = "screenshot.jpg";

/// Decode image bytes, fit them within 1024x1024 and re-encode as JPEG.
///
/// Smaller images are never enlarged; aspect ratio is always preserved. The
/// resize filter and encoder quality are fixed, so identical input bytes
/// yield a bit-identical envelope.
pub fn normalize_image(bytes: &[u8], filename: &str) -> Result<ContentEnvelope, GatewayError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| GatewayError::ImageDecodeError(err.to_string()))?;

    let resized = if decoded.width() > MAX_IMAGE_DIMENSION || decoded.height() > MAX_IMAGE_DIMENSION
    {
        decoded.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Lanczos3)
    } else {
        decoded
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut Cursor::new(&mut encoded), JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|err| GatewayError::ImageDecodeError(format!("re-encode failed: {err}")))?;

    Ok(ContentEnvelope {
        kind: AttachmentKind::Image,
        data: STANDARD.encode(&encoded),
        filename: filename.to_string(),
        byte_size: encoded.len() as u64,
        mime_type: "image/jpeg".to_string(),
    })
}

/// Normalize a pasted-screenshot payload: strip an optional
/// `data:image/...;base64,` prefix, decode, then run the image path.
pub fn normalize_base64_image(data: &str) -> Result<ContentEnvelope, GatewayError> {
    let payload = match data.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, body)| body)
            .ok_or_else(|| {
                GatewayError::ImageDecodeError("malformed data URL: missing base64 marker".into())
            })?,
        None => data,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| GatewayError::ImageDecodeError(format!("invalid base64: {err}")))?;

    normalize_image(&bytes, SCREENSHOT_FILENAME)
}
