//! DeepSeek chat backend (Azure-hosted deployment wire shape).

use async_trait::async_trait;
use serde::Serialize;

use super::{
    ChatCompletionResponse, ProviderAdapter, WireMessage, build_chat_messages,
    error_from_response, first_choice, map_transport_error,
};
use crate::config::DeepSeekConfig;
use crate::error::GatewayError;
use crate::types::{ContentEnvelope, ConversationTurn, ResponseEnvelope};

const PROVIDER_LABEL: &str = "DeepSeek AI";
const MODEL_LABEL: &str = "DeepSeek";
const SYSTEM_PROMPT: &str = "You are DeepSeek, an advanced AI with strong reasoning and coding \
     capabilities. Provide thoughtful and detailed responses.";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
struct DeepSeekChatRequest<'a> {
    messages: Vec<WireMessage>,
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
}

/// Chat adapter for a DeepSeek deployment.
#[derive(Debug, Clone)]
pub struct DeepSeekChatAdapter {
    config: Option<DeepSeekConfig>,
    http_client: reqwest::Client,
}

impl DeepSeekChatAdapter {
    pub fn new(config: Option<DeepSeekConfig>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn chat_url(config: &DeepSeekConfig) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.trim_end_matches('/'),
            config.model,
            config.api_version,
        )
    }
}

#[async_trait]
impl ProviderAdapter for DeepSeekChatAdapter {
    async fn respond(
        &self,
        message: &str,
        envelope: Option<&ContentEnvelope>,
        history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        let config = self.config.as_ref().ok_or_else(|| {
            GatewayError::ProviderUnavailable("DeepSeek configuration is incomplete".into())
        })?;

        let request = DeepSeekChatRequest {
            messages: build_chat_messages(SYSTEM_PROMPT, message, envelope, history),
            model: &config.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %config.model, "sending DeepSeek chat request");
        let response = self
            .http_client
            .post(Self::chat_url(config))
            .header("api-key", config.expose_api_key())
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| map_transport_error(PROVIDER_LABEL, config.timeout, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ChatCompletionResponse =
            response.json().await.map_err(|err| GatewayError::ProviderError {
                status: status.as_u16(),
                message: format!("unexpected response body: {err}"),
            })?;
        let (content, usage) = first_choice(body, status.as_u16())?;

        Ok(ResponseEnvelope {
            content,
            model: MODEL_LABEL.to_string(),
            provider: PROVIDER_LABEL.to_string(),
            usage,
            image_url: None,
        })
    }
}
