//! Attachment input and normalized envelope types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of attachment content a model can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Text,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Where the raw artifact lives before normalization.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    /// A multipart upload already written to transient storage.
    UploadedFile {
        path: PathBuf,
        original_filename: String,
        mime_type: String,
        size_bytes: u64,
    },
    /// A pasted screenshot delivered as a base64 payload, optionally wrapped
    /// in a `data:image/...;base64,` prefix. Always an image.
    Base64Blob { data: String },
}

/// One uploaded artifact accompanying a chat turn.
///
/// Owned exclusively by the request that carries it; consumed once by
/// normalization and released by the lifecycle guard before the dispatcher
/// returns.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub source: AttachmentSource,
}

impl Attachment {
    pub fn uploaded_file(
        path: impl Into<PathBuf>,
        original_filename: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            source: AttachmentSource::UploadedFile {
                path: path.into(),
                original_filename: original_filename.into(),
                mime_type: mime_type.into(),
                size_bytes,
            },
        }
    }

    pub fn base64_blob(data: impl Into<String>) -> Self {
        Self {
            source: AttachmentSource::Base64Blob { data: data.into() },
        }
    }

    /// Filename shown to the provider in content markers.
    pub fn filename(&self) -> &str {
        match &self.source {
            AttachmentSource::UploadedFile {
                original_filename, ..
            } => original_filename,
            AttachmentSource::Base64Blob { .. } => "screenshot.jpg",
        }
    }

    /// Declared MIME type, falling back to an extension-based guess for
    /// uploads whose client sent none.
    pub fn mime_type(&self) -> String {
        match &self.source {
            AttachmentSource::UploadedFile {
                mime_type,
                original_filename,
                ..
            } => {
                if mime_type.is_empty() {
                    mime_guess::from_path(original_filename)
                        .first_raw()
                        .unwrap_or("application/octet-stream")
                        .to_string()
                } else {
                    mime_type.clone()
                }
            }
            AttachmentSource::Base64Blob { .. } => "image/jpeg".to_string(),
        }
    }

    /// Lowercased filename extension without the dot, when present.
    pub fn extension(&self) -> Option<String> {
        match &self.source {
            AttachmentSource::UploadedFile {
                original_filename, ..
            } => Path::new(original_filename)
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase()),
            AttachmentSource::Base64Blob { .. } => Some("jpg".to_string()),
        }
    }

    /// Size used for the capability ceiling check. For base64 blobs this is
    /// the encoded payload length, a safe over-approximation of the bytes.
    pub fn size_bytes(&self) -> u64 {
        match &self.source {
            AttachmentSource::UploadedFile { size_bytes, .. } => *size_bytes,
            AttachmentSource::Base64Blob { data } => data.len() as u64,
        }
    }
}

/// Normalized, size-bounded attachment content ready for a provider.
///
/// Images are base64 of the re-encoded JPEG; text is UTF-8 capped at the
/// text ceiling with a truncation marker. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEnvelope {
    pub kind: AttachmentKind,
    pub data: String,
    pub filename: String,
    pub byte_size: u64,
    pub mime_type: String,
}
