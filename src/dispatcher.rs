//! Request dispatch.
//!
//! The single entry point of the gateway core. `handle` validates the model
//! id and attachment against the capability registry, normalizes the
//! attachment, routes to the backend adapter bound to the model id, and
//! guarantees the attachment's transient storage is released exactly once on
//! every exit path.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::lifecycle::AttachmentGuard;
use crate::normalize;
use crate::providers::{
    AzureChatAdapter, DeepSeekChatAdapter, ImageGenerationAdapter, OfflineAdapter, ProviderAdapter,
};
use crate::registry::{CapabilityRegistry, CredentialRequirement, ModelCapability};
use crate::types::{
    Attachment, AttachmentKind, AttachmentSource, ContentEnvelope, ConversationTurn,
    ResponseEnvelope,
};

/// One registry entry annotated with configuration-derived availability.
#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub model_id: &'static str,
    pub display_name: &'static str,
    pub provider: &'static str,
    pub max_tokens: u32,
    pub available: bool,
}

/// Routes chat turns to the backend bound to each model id.
///
/// The model id to adapter table is resolved once at construction; per-call
/// work is a registry lookup plus a map lookup.
pub struct Dispatcher {
    registry: CapabilityRegistry,
    adapters: HashMap<&'static str, Arc<dyn ProviderAdapter>>,
    config: GatewayConfig,
}

impl Dispatcher {
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = reqwest::Client::new();

        let mut adapters: HashMap<&'static str, Arc<dyn ProviderAdapter>> = HashMap::new();
        adapters.insert(
            "gpt5",
            Arc::new(AzureChatAdapter::new(
                config.azure.clone(),
                http_client.clone(),
            )),
        );
        adapters.insert(
            "deepseek",
            Arc::new(DeepSeekChatAdapter::new(
                config.deepseek.clone(),
                http_client.clone(),
            )),
        );
        adapters.insert("grok", Arc::new(OfflineAdapter::new()));
        adapters.insert(
            "image-gen",
            Arc::new(ImageGenerationAdapter::new(
                config.azure.clone(),
                http_client,
                config.image_timeout,
            )),
        );

        Self {
            registry: CapabilityRegistry::builtin(),
            adapters,
            config,
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Registry entries with availability derived from configured credentials.
    pub fn available_models(&self) -> Vec<ModelStatus> {
        self.registry
            .iter()
            .map(|cap| ModelStatus {
                model_id: cap.model_id,
                display_name: cap.display_name,
                provider: cap.provider_label,
                max_tokens: cap.max_tokens,
                available: match cap.credential {
                    CredentialRequirement::Azure => self.config.azure.is_some(),
                    CredentialRequirement::DeepSeek => self.config.deepseek.is_some(),
                    CredentialRequirement::None => false,
                },
            })
            .collect()
    }

    /// Handle one chat turn.
    ///
    /// Validation errors surface before any provider call; once an
    /// attachment is present its storage is released exactly once no matter
    /// how the request ends (the guard also covers cancellation).
    pub async fn handle(
        &self,
        model_id: &str,
        message: &str,
        attachment: Option<Attachment>,
        history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        let capability = self.registry.lookup(model_id)?;
        let adapter = self
            .adapters
            .get(model_id)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownModel(model_id.to_string()))?;

        tracing::debug!(
            model = model_id,
            has_attachment = attachment.is_some(),
            history_len = history.len(),
            "dispatching chat turn"
        );

        let result = match &attachment {
            None => adapter.respond(message, None, history).await,
            Some(attachment) => {
                let mut guard = AttachmentGuard::acquire(attachment);
                let outcome = self
                    .respond_with_attachment(capability, adapter, message, attachment, history)
                    .await;
                guard.release().await;
                outcome
            }
        };

        match &result {
            Ok(response) => {
                tracing::info!(model = model_id, provider = %response.provider, "chat turn succeeded");
            }
            Err(err) => {
                tracing::warn!(model = model_id, error = %err, "chat turn failed");
            }
        }
        result
    }

    async fn respond_with_attachment(
        &self,
        capability: &ModelCapability,
        adapter: Arc<dyn ProviderAdapter>,
        message: &str,
        attachment: &Attachment,
        history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        let kind = normalize::classify(&attachment.mime_type(), attachment.extension().as_deref())?;

        if !capability.allows(kind) {
            return Err(GatewayError::CapabilityViolation {
                model: capability.model_id.to_string(),
                reason: format!("{kind} attachments are not supported"),
            });
        }
        if attachment.size_bytes() > capability.max_attachment_bytes {
            return Err(GatewayError::CapabilityViolation {
                model: capability.model_id.to_string(),
                reason: format!(
                    "attachment of {} bytes exceeds the {} byte limit",
                    attachment.size_bytes(),
                    capability.max_attachment_bytes
                ),
            });
        }

        let envelope = self.normalize_attachment(attachment, kind).await?;
        adapter.respond(message, Some(&envelope), history).await
    }

    async fn normalize_attachment(
        &self,
        attachment: &Attachment,
        kind: AttachmentKind,
    ) -> Result<ContentEnvelope, GatewayError> {
        match &attachment.source {
            AttachmentSource::Base64Blob { data } => normalize::normalize_base64_image(data),
            AttachmentSource::UploadedFile {
                path,
                original_filename,
                ..
            } => {
                let bytes = tokio::fs::read(path).await?;
                match kind {
                    AttachmentKind::Image => normalize::normalize_image(&bytes, original_filename),
                    AttachmentKind::Text => normalize::normalize_text(
                        &bytes,
                        &attachment.mime_type(),
                        original_filename,
                    ),
                }
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("models", &self.adapters.keys().collect::<Vec<_>>())
            .field("azure_configured", &self.config.azure.is_some())
            .field("deepseek_configured", &self.config.deepseek.is_some())
            .finish()
    }
}
