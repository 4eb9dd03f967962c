//! Provider adapters.
//!
//! Each backend implements [`ProviderAdapter`] behind the same contract:
//! take a user message, an optional normalized attachment envelope and the
//! caller-supplied history, issue at most one HTTP request, and map the raw
//! provider payload into a [`ResponseEnvelope`]. Adapters never see raw
//! attachment bytes; normalization has already bounded everything they get.

mod azure;
mod deepseek;
mod image_gen;
mod offline;

pub use azure::AzureChatAdapter;
pub use deepseek::DeepSeekChatAdapter;
pub use image_gen::ImageGenerationAdapter;
pub use offline::OfflineAdapter;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::types::{AttachmentKind, ContentEnvelope, ConversationTurn, MessageRole, ResponseEnvelope, Usage};

/// Common contract for every backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Issue one request to the backend and normalize its response.
    async fn respond(
        &self,
        message: &str,
        envelope: Option<&ContentEnvelope>,
        history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError>;
}

/// Chat-completion wire message.
#[derive(Debug, Serialize)]
pub(crate) struct WireMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Chat-completion wire response: `choices[0].message.content` + `usage`.
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: String,
}

/// Build the message list sent to a chat backend:
/// `[system] + history + [user turn with attachment suffix]`.
pub(crate) fn build_chat_messages(
    system_prompt: &str,
    message: &str,
    envelope: Option<&ContentEnvelope>,
    history: &[ConversationTurn],
) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(WireMessage {
        role: MessageRole::System,
        content: system_prompt.to_string(),
    });
    messages.extend(history.iter().map(|turn| WireMessage {
        role: turn.role,
        content: turn.content.clone(),
    }));
    messages.push(WireMessage {
        role: MessageRole::User,
        content: build_user_content(message, envelope),
    });
    messages
}

/// Append the attachment to the user turn. Text content is inlined with a
/// filename header; images contribute a filename marker only, since the
/// text channel never carries raw image bytes.
pub(crate) fn build_user_content(message: &str, envelope: Option<&ContentEnvelope>) -> String {
    let Some(envelope) = envelope else {
        return message.to_string();
    };

    match envelope.kind {
        AttachmentKind::Text => format!(
            "{message}\n\n[File content from {}]:\n{}",
            envelope.filename, envelope.data
        ),
        AttachmentKind::Image => {
            format!("{message}\n\n[Image uploaded: {}]", envelope.filename)
        }
    }
}

/// Map a transport-level failure from `reqwest` into the gateway taxonomy.
pub(crate) fn map_transport_error(
    provider: &str,
    timeout: Duration,
    err: reqwest::Error,
) -> GatewayError {
    if err.is_timeout() {
        GatewayError::ProviderTimeout {
            provider: provider.to_string(),
            timeout_secs: timeout.as_secs(),
        }
    } else {
        GatewayError::HttpError(format!("{provider}: {err}"))
    }
}

/// Turn a non-success provider response into `ProviderError`, preferring the
/// `error.message` field the chat backends embed in their error bodies.
pub(crate) async fn error_from_response(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body);
    GatewayError::ProviderError { status, message }
}

/// Pull the first choice out of a chat-completion body.
pub(crate) fn first_choice(
    body: ChatCompletionResponse,
    status: u16,
) -> Result<(String, Option<Usage>), GatewayError> {
    let usage = body.usage;
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or(GatewayError::ProviderError {
            status,
            message: "response contained no choices".to_string(),
        })?;
    Ok((choice.message.content, usage))
}
