//! Gateway error taxonomy.
//!
//! One crate-level error type covers the whole dispatch pipeline: validation
//! failures detected before any remote call, normalization failures, and
//! provider-side failures. Cleanup failures are deliberately *not* part of
//! this taxonomy; attachment cleanup is logged and never replaces the
//! primary outcome of a request.

use thiserror::Error;

/// Errors produced by the gateway core.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The model id has no capability registry entry.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The attachment's kind or size is not allowed for the target model.
    #[error("Capability violation for model '{model}': {reason}")]
    CapabilityViolation { model: String, reason: String },

    /// The attachment is neither an image nor a text artifact we accept.
    #[error("Unsupported attachment type: {0}")]
    UnsupportedAttachmentType(String),

    /// Image bytes could not be decoded or re-encoded.
    #[error("Image processing failed: {0}")]
    ImageDecodeError(String),

    /// Text bytes are not valid UTF-8.
    #[error("Text file processing failed: {0}")]
    TextDecodeError(String),

    /// The selected backend has no (complete) configuration.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider did not answer within its timeout budget.
    #[error("Provider '{provider}' timed out after {timeout_secs}s")]
    ProviderTimeout { provider: String, timeout_secs: u64 },

    /// The provider answered with a non-success status or an unexpected body.
    #[error("Provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    /// Transport-level failure below HTTP (connect, TLS, ...).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Reading the attachment from transient storage failed.
    #[error("IO error: {0}")]
    IoError(String),
}

impl GatewayError {
    /// HTTP status carried by the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ProviderError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors detected before any remote call was issued.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownModel(_)
                | Self::CapabilityViolation { .. }
                | Self::UnsupportedAttachmentType(_)
        )
    }

    /// True for failures originating at the provider boundary.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_)
                | Self::ProviderTimeout { .. }
                | Self::ProviderError { .. }
                | Self::HttpError(_)
        )
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
