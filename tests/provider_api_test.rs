//! Mock API tests for the provider adapters.
//!
//! These use wiremock to simulate the chat-completion and image-generation
//! wire shapes the hosted deployments return, including error bodies.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fusionai_gateway::providers::{
    AzureChatAdapter, DeepSeekChatAdapter, ImageGenerationAdapter, ProviderAdapter,
};
use fusionai_gateway::{AzureConfig, DeepSeekConfig, GatewayError};

/// Route test logging through the capturing test writer; `RUST_LOG` controls
/// verbosity.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn chat_completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }],
        "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
    })
}

#[tokio::test]
async fn azure_chat_success_maps_content_and_usage() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-5/chat/completions"))
        .and(query_param("api-version", "2024-02-15-preview"))
        .and(header("api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_completion_body("Hello there!")),
        )
        .mount(&mock_server)
        .await;

    let adapter = AzureChatAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
    );
    let response = adapter.respond("hi", None, &[]).await.unwrap();

    assert_eq!(response.content, "Hello there!");
    assert_eq!(response.model, "GPT-5");
    assert_eq!(response.provider, "Azure OpenAI");
    let usage = response.usage.unwrap();
    assert_eq!(usage.total_tokens, 21);
    assert!(response.image_url.is_none());
}

#[tokio::test]
async fn azure_chat_sends_fixed_sampling_parameters() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-5/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body("ok")))
        .mount(&mock_server)
        .await;

    let adapter = AzureChatAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
    );
    adapter.respond("hi", None, &[]).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["temperature"], 0.7);
    assert_eq!(body["top_p"], 0.95);
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn azure_error_body_message_is_extracted() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-5/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": "429", "message": "Requests are being throttled" }
        })))
        .mount(&mock_server)
        .await;

    let adapter = AzureChatAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
    );
    let err = adapter.respond("hi", None, &[]).await.unwrap_err();

    match err {
        GatewayError::ProviderError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Requests are being throttled");
        }
        other => panic!("expected ProviderError, got {other:?}"),
    }
}

#[tokio::test]
async fn azure_malformed_success_body_is_a_provider_error() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-5/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let adapter = AzureChatAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
    );
    let err = adapter.respond("hi", None, &[]).await.unwrap_err();
    assert!(matches!(err, GatewayError::ProviderError { status: 200, .. }));
}

#[tokio::test]
async fn azure_chat_times_out_within_its_budget() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-5/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")
        .with_timeout(Duration::from_millis(200));
    let adapter = AzureChatAdapter::new(Some(config), reqwest::Client::new());
    let err = adapter.respond("hi", None, &[]).await.unwrap_err();

    assert!(matches!(
        err,
        GatewayError::ProviderTimeout { provider, .. } if provider == "Azure OpenAI"
    ));
}

#[tokio::test]
async fn deepseek_chat_includes_model_and_its_token_ceiling() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/deepseek-chat/chat/completions"))
        .and(header("api-key", "ds-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body("answer")))
        .mount(&mock_server)
        .await;

    let adapter = DeepSeekChatAdapter::new(
        Some(DeepSeekConfig::new(mock_server.uri(), "ds-key", "deepseek-chat")),
        reqwest::Client::new(),
    );
    let response = adapter.respond("hi", None, &[]).await.unwrap();
    assert_eq!(response.model, "DeepSeek");
    assert_eq!(response.provider, "DeepSeek AI");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["max_tokens"], 2048);
    assert!(body.get("top_p").is_none());
}

#[tokio::test]
async fn deepseek_error_body_message_is_extracted() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/deepseek-chat/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "401", "message": "Access denied due to invalid subscription key" }
        })))
        .mount(&mock_server)
        .await;

    let adapter = DeepSeekChatAdapter::new(
        Some(DeepSeekConfig::new(mock_server.uri(), "bad-key", "deepseek-chat")),
        reqwest::Client::new(),
    );
    let err = adapter.respond("hi", None, &[]).await.unwrap_err();

    match err {
        GatewayError::ProviderError { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Access denied due to invalid subscription key");
        }
        other => panic!("expected ProviderError, got {other:?}"),
    }
}

#[tokio::test]
async fn image_generation_returns_the_image_url() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/dall-e-3/images/generations"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{ "url": "https://images.example.com/fox.png" }]
        })))
        .mount(&mock_server)
        .await;

    let adapter = ImageGenerationAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
        Duration::from_secs(60),
    );
    let response = adapter.respond("a red fox", None, &[]).await.unwrap();

    assert_eq!(
        response.image_url.as_deref(),
        Some("https://images.example.com/fox.png")
    );
    assert!(response.content.contains("a red fox"));
    assert_eq!(response.model, "DALL-E 3");

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["prompt"], "a red fox");
    assert_eq!(body["n"], 1);
    assert_eq!(body["size"], "1024x1024");
}

#[tokio::test]
async fn image_generation_with_empty_data_is_a_provider_error() {
    init_tracing();
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/dall-e-3/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&mock_server)
        .await;

    let adapter = ImageGenerationAdapter::new(
        Some(AzureConfig::new(mock_server.uri(), "test-key", "gpt-5")),
        reqwest::Client::new(),
        Duration::from_secs(60),
    );
    let err = adapter.respond("a red fox", None, &[]).await.unwrap_err();
    assert!(matches!(err, GatewayError::ProviderError { .. }));
}
