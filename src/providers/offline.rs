//! Offline responder for a backend the gateway does not serve live.

use async_trait::async_trait;

use super::ProviderAdapter;
use crate::error::GatewayError;
use crate::types::{ContentEnvelope, ConversationTurn, ResponseEnvelope};

const PROVIDER_LABEL: &str = "xAI";
const MODEL_LABEL: &str = "Grok-3";
const OFFLINE_MESSAGE: &str = "I'm currently offline for maintenance. Grok-3 will be back online \
     soon with enhanced capabilities!";

/// Always answers with a fixed maintenance notice; never touches the network.
#[derive(Debug, Clone, Default)]
pub struct OfflineAdapter;

impl OfflineAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderAdapter for OfflineAdapter {
    async fn respond(
        &self,
        _message: &str,
        _envelope: Option<&ContentEnvelope>,
        _history: &[ConversationTurn],
    ) -> Result<ResponseEnvelope, GatewayError> {
        Ok(ResponseEnvelope {
            content: OFFLINE_MESSAGE.to_string(),
            model: MODEL_LABEL.to_string(),
            provider: PROVIDER_LABEL.to_string(),
            usage: None,
            image_url: None,
        })
    }
}
