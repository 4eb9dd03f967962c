//! Model capability registry.
//!
//! A read-only table mapping each routable model id to the attachment kinds
//! it accepts and its size/token ceilings. Built once at dispatcher
//! construction; concurrent lookups need no synchronization.

use crate::error::GatewayError;
use crate::types::AttachmentKind;

const MIB: u64 = 1024 * 1024;

/// Which configured credential a model needs to be reported as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRequirement {
    /// Azure OpenAI endpoint + key.
    Azure,
    /// DeepSeek endpoint + key.
    DeepSeek,
    /// Served by the offline responder; never live.
    None,
}

/// Immutable capability entry for one model id.
#[derive(Debug, Clone)]
pub struct ModelCapability {
    pub model_id: &'static str,
    /// Human-readable model label used in responses, e.g. `GPT-5 Chat`.
    pub display_name: &'static str,
    /// Human-readable provider label, e.g. `Azure OpenAI`.
    pub provider_label: &'static str,
    /// Attachment kinds this model accepts; empty means no attachments.
    pub allowed_kinds: &'static [AttachmentKind],
    /// Ceiling for a single attachment, pre-normalization.
    pub max_attachment_bytes: u64,
    pub max_tokens: u32,
    pub credential: CredentialRequirement,
}

impl ModelCapability {
    pub fn allows(&self, kind: AttachmentKind) -> bool {
        self.allowed_kinds.contains(&kind)
    }
}

/// Read-only model id to capability table.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    entries: Vec<ModelCapability>,
}

impl CapabilityRegistry {
    /// The built-in model set served by the gateway.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ModelCapability {
                    model_id: "gpt5",
                    display_name: "GPT-5 Chat",
                    provider_label: "Azure OpenAI",
                    allowed_kinds: &[AttachmentKind::Image, AttachmentKind::Text],
                    max_attachment_bytes: 10 * MIB,
                    max_tokens: 4096,
                    credential: CredentialRequirement::Azure,
                },
                ModelCapability {
                    model_id: "deepseek",
                    display_name: "DeepSeek Chat",
                    provider_label: "DeepSeek AI",
                    allowed_kinds: &[AttachmentKind::Text],
                    max_attachment_bytes: 5 * MIB,
                    max_tokens: 2048,
                    credential: CredentialRequirement::DeepSeek,
                },
                ModelCapability {
                    model_id: "grok",
                    display_name: "Grok-3",
                    provider_label: "xAI",
                    allowed_kinds: &[],
                    max_attachment_bytes: 0,
                    max_tokens: 2048,
                    credential: CredentialRequirement::None,
                },
                ModelCapability {
                    model_id: "image-gen",
                    display_name: "Image Generation",
                    provider_label: "Azure OpenAI",
                    allowed_kinds: &[],
                    max_attachment_bytes: 0,
                    max_tokens: 1000,
                    credential: CredentialRequirement::Azure,
                },
            ],
        }
    }

    pub fn lookup(&self, model_id: &str) -> Result<&ModelCapability, GatewayError> {
        self.entries
            .iter()
            .find(|entry| entry.model_id == model_id)
            .ok_or_else(|| GatewayError::UnknownModel(model_id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelCapability> {
        self.entries.iter()
    }
}
