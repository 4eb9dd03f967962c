//! Image generation backend (Azure-hosted DALL-E deployment).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ProviderAdapter, error_from_response, map_transport_error};
use crate::config::AzureConfig;
use crate::error::GatewayError;
use crate::types::{ContentEnvelope, ConversationTurn, ResponseEnvelope};

const PROVIDER_LABEL: &str = "Azure OpenAI";
const MODEL_LABEL: &str = "DALL-E 3";
const DEPLOYMENT: &str = "dall-e-3";

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'static str,
    quality: &'static str,
    style: &'static str,
}

/// Image-generation wire response: `data[0].url`.
#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

/// Adapter for the image-generation backend.
///
/// The message is the generation prompt; any attachment envelope or history
/// the dispatcher has on hand is irrelevant here and ignored.
#[derive(Debug, Clone)]
pub struct ImageGenerationAdapter {
    config: Option<AzureConfig>,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl ImageGenerationAdapter {
    pub fn new(
        config: Option<AzureConfig>,
        http_client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            http_client,
            timeout,
        }
    }

    fn generation_url(config: &AzureConfig) -> String {
        format!(
            "{}/openai/deployments/{}/images/generations?api-version={}",
            config.endpoint.trim_end_matches('/'),
            DEPLOYMENT,
            config.api_version,
        )
    }
}

#[async_trait]
impl ProviderAdapter for ImageGenerationAdapter {
    async fn respond(
        &self,
        message: &str,
        _envelope: Option<&ContentEnvelope>,
        _history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        let config = self.config.as_ref().ok_or_else(|| {
            GatewayError::ProviderUnavailable("Azure OpenAI configuration is incomplete".into())
        })?;

        let request = ImageGenerationRequest {
            prompt: message,
            n: 1,
            size: "1024x1024",
            quality: "standard",
            style: "natural",
        };

        tracing::debug!("sending image generation request");
        let response = self
            .http_client
            .post(Self::generation_url(config))
            .header("api-key", config.expose_api_key())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| map_transport_error(PROVIDER_LABEL, self.timeout, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: ImageGenerationResponse =
            response.json().await.map_err(|err| GatewayError::ProviderError {
                status: status.as_u16(),
                message: format!("unexpected response body: {err}"),
            })?;
        let image = body.data.into_iter().next().ok_or(GatewayError::ProviderError {
            status: status.as_u16(),
            message: "response contained no generated images".to_string(),
        })?;

        Ok(ResponseEnvelope {
            content: format!("Image generated successfully for prompt: \"{message}\""),
            model: MODEL_LABEL.to_string(),
            provider: PROVIDER_LABEL.to_string(),
            usage: None,
            image_url: Some(image.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IMAGE_TIMEOUT;

    #[tokio::test]
    async fn missing_config_is_provider_unavailable() {
        let adapter = ImageGenerationAdapter::new(None, reqwest::Client::new(), IMAGE_TIMEOUT);
        let err = adapter.respond("a red fox", None, &[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::ProviderUnavailable(_)));
    }

    #[test]
    fn generation_url_targets_the_dalle_deployment() {
        let config = AzureConfig::new("https://r.openai.azure.com", "k", "gpt-5")
            .with_api_version("2024-02-15-preview");
        assert_eq!(
            ImageGenerationAdapter::generation_url(&config),
            "https://r.openai.azure.com/openai/deployments/dall-e-3/images/generations?api-version=2024-02-15-preview"
        );
    }
}
