//! Azure OpenAI chat backend.

use async_trait::async_trait;
use serde::Serialize;

use super::{
    ChatCompletionResponse, ProviderAdapter, WireMessage, build_chat_messages,
    error_from_response, first_choice, map_transport_error,
};
use crate::config::AzureConfig;
use crate::error::GatewayError;
use crate::types::{ContentEnvelope, ConversationTurn, ResponseEnvelope};

const PROVIDER_LABEL: &str = "Azure OpenAI";
const MODEL_LABEL: &str = "GPT-5";
const SYSTEM_PROMPT: &str =
    "You are GPT-5, an advanced AI assistant. Provide helpful, accurate, and detailed responses.";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 0.95;

#[derive(Debug, Serialize)]
struct AzureChatRequest {
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

/// Chat adapter for an Azure OpenAI deployment.
#[derive(Debug, Clone)]
pub struct AzureChatAdapter {
    config: Option<AzureConfig>,
    http_client: reqwest::Client,
}

impl AzureChatAdapter {
    pub fn new(config: Option<AzureConfig>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn chat_url(config: &AzureConfig) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint.trim_end_matches('/'),
            config.deployment,
            config.api_version,
        )
    }
}

#[async_trait]
impl ProviderAdapter for AzureChatAdapter {
    async fn respond(
        &self,
        message: &str,
        envelope: Option<&ContentEnvelope>,
        history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        let config = self.config.as_ref().ok_or_else(|| {
            GatewayError::ProviderUnavailable("Azure OpenAI configuration is incomplete".into())
        })?;

        let request = AzureChatRequest {
            messages: build_chat_messages(SYSTEM_PROMPT, message, envelope, history),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        tracing::debug!(deployment = %config.deployment, "sending Azure OpenAI chat request");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_config_is_provider_unavailable() {
        let adapter = AzureChatAdapter::new(None, reqwest::Client::new());
        let err = adapter.respond("hi", None, &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::ProviderUnavailable(_)));
    }

    #[test]
    fn chat_url_is_deployment_scoped() {
        let config = AzureConfig::new("https://r.openai.azure.com/", "k", "gpt-5")
            .with_api_version("2024-02-15-preview");
        assert_eq!(
            AzureChatAdapter::chat_url(&config),
            "https://r.openai.azure.com/openai/deployments/gpt-5/chat/completions?api-version=2024-02-15-preview"
        );
    }
}
