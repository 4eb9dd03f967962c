//! Backend configuration.
//!
//! Credentials and endpoints are injected explicitly at dispatcher
//! construction; nothing in the core reads ambient state after that point.
//! `from_env` exists for binaries that wire the gateway from the process
//! environment, mirroring the deployment surface of the hosted gateway.

use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Default request budget for chat backends.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default request budget for image generation.
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_API_VERSION: &str = "2024-02-15-preview";

/// Azure OpenAI connection settings (also used for image generation).
#[derive(Clone)]
pub struct AzureConfig {
    /// Resource base URL, e.g. `https://my-resource.openai.azure.com`.
    pub endpoint: String,
    pub api_key: SecretString,
    /// Chat deployment id.
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AzureConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: SecretString::from(api_key.into()),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: CHAT_TIMEOUT,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn expose_api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// DeepSeek connection settings (Azure-hosted deployment shape).
#[derive(Clone)]
pub struct DeepSeekConfig {
    pub endpoint: String,
    pub api_key: SecretString,
    /// Model/deployment id, e.g. `deepseek-chat`.
    pub model: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for DeepSeekConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DeepSeekConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: CHAT_TIMEOUT,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn expose_api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Configuration for every backend the gateway can route to.
///
/// A `None` entry means the corresponding models answer with
/// `ProviderUnavailable` and are listed as unavailable.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub azure: Option<AzureConfig>,
    pub deepseek: Option<DeepSeekConfig>,
    /// Request budget for the image-generation backend.
    pub image_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self {
            azure: None,
            deepseek: None,
            image_timeout: IMAGE_TIMEOUT,
        }
    }

    pub fn with_azure(mut self, azure: AzureConfig) -> Self {
        self.azure = Some(azure);
        self
    }

    pub fn with_deepseek(mut self, deepseek: DeepSeekConfig) -> Self {
        self.deepseek = Some(deepseek);
        self
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    /// Build configuration from the process environment.
    ///
    /// A backend is configured only when its endpoint, key and
    /// deployment/model variables are all present and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let (Some(endpoint), Some(api_key), Some(deployment)) = (
            non_empty_var("AZURE_OPENAI_ENDPOINT"),
            non_empty_var("AZURE_OPENAI_API_KEY"),
            non_empty_var("AZURE_OPENAI_DEPLOYMENT_NAME"),
        ) {
            let mut azure = AzureConfig::new(endpoint, api_key, deployment);
            if let Some(version) = non_empty_var("AZURE_OPENAI_API_VERSION") {
                azure = azure.with_api_version(version);
            }
            config.azure = Some(azure);
        }

        if let (Some(endpoint), Some(api_key), Some(model)) = (
            non_empty_var("DEEPSEEK_ENDPOINT"),
            non_empty_var("DEEPSEEK_API_KEY"),
            non_empty_var("DEEPSEEK_MODEL"),
        ) {
            let mut deepseek = DeepSeekConfig::new(endpoint, api_key, model);
            if let Some(version) = non_empty_var("DEEPSEEK_API_VERSION") {
                deepseek = deepseek.with_api_version(version);
            }
            config.deepseek = Some(deepseek);
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
