//! OpenAI-compatible provider implementation
//!
//! Implements [`LLMProvider`] for any endpoint that speaks the OpenAI
//! chat-completions protocol. The dashboards point it at OpenRouter.
//! See: https://openrouter.ai/docs/api-reference/chat-completion
//!
//! # Examples
//!
//! ```no_run
//! use stockcheck_llm::{CompletionRequest, LLMProvider, Message};
//! use stockcheck_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAIConfig::openrouter("sk-or-...")
//!         .with_header("HTTP-Referer", "https://github.com/pranay784/stockcheck");
//!     let provider = OpenAIProvider::with_config(config)?;
//!
//!     let request = CompletionRequest::builder("deepseek/deepseek-chat-v3.1:free")
//!         .add_message(Message::user("Ticker for Apple?"))
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.content);
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// OpenRouter's OpenAI-compatible API root
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Request timeout in seconds. `None` keeps reqwest's default behaviour.
    pub timeout_secs: Option<u64>,

    /// Extra headers sent with every request (e.g. OpenRouter's `HTTP-Referer`)
    pub extra_headers: Vec<(String, String)>,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Create a config targeting OpenRouter
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new(api_key).with_api_base(OPENROUTER_API_BASE)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: None,
            extra_headers: Vec::new(),
        }
    }
}

/// OpenAI-compatible chat-completions provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Create a new provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat completion to {}", self.config.api_base);

        let openai_request = OpenAIRequest {
            model: request.model.clone(),
            messages: build_openai_messages(request.messages),
            max_tokens: request.max_tokens,
        };

        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");
        for (name, value) in &self.config.extra_headers {
            http_request = http_request.header(name.as_str(), value.as_str());
        }

        let response = http_request.json(&openai_request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let body = response.text().await?;
        parse_openai_response(&body)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn build_openai_messages(messages: Vec<Message>) -> Vec<OpenAIMessage> {
    messages
        .into_iter()
        .map(|msg| OpenAIMessage {
            role: msg.role.as_str(),
            content: msg.content,
        })
        .collect()
}

fn parse_openai_response(body: &str) -> Result<CompletionResponse> {
    let openai_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

    // Several choices may come back; only the first is used
    let choice = openai_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let usage = openai_response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let finish_reason = choice.finish_reason.unwrap_or_default();
    debug!(
        "Received response - stop_reason: {}, tokens: {}/{}",
        finish_reason, usage.input_tokens, usage.output_tokens
    );

    Ok(CompletionResponse {
        message: Message {
            role: Role::Assistant,
            content: choice.message.content.unwrap_or_default(),
        },
        stop_reason: map_stop_reason(&finish_reason),
        usage,
    })
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        _ => {
            debug!("Unknown stop reason: {}", reason);
            StopReason::EndTurn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAIProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.config().api_key, "test-key");
        assert_eq!(provider.config().api_base, "https://api.openai.com/v1");
        assert!(provider.config().timeout_secs.is_none());
    }

    #[test]
    fn test_openrouter_config() {
        let config = OpenAIConfig::openrouter("sk-or-test")
            .with_header("HTTP-Referer", "https://github.com/pranay784/stockcheck")
            .with_timeout(30);

        assert_eq!(config.api_base, "https://openrouter.ai/api/v1");
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(
            config.extra_headers,
            vec![(
                "HTTP-Referer".to_string(),
                "https://github.com/pranay784/stockcheck".to_string()
            )]
        );
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let request = OpenAIRequest {
            model: "m".to_string(),
            messages: build_openai_messages(vec![Message::user("hi")]),
            max_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "gen-1",
            "choices": [{"message": {"role": "assistant", "content": " aapl \n"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 30, "completion_tokens": 2, "total_tokens": 32}
        }"#;

        let response = parse_openai_response(body).unwrap();
        assert_eq!(response.message.role, Role::Assistant);
        assert_eq!(response.message.content, " aapl \n");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 32);
    }

    #[test]
    fn test_parse_response_without_usage_or_reason() {
        let body = r#"{"choices": [{"message": {"content": "MSFT"}, "finish_reason": null}]}"#;
        let response = parse_openai_response(body).unwrap();
        assert_eq!(response.message.text(), Some("MSFT"));
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn test_parse_response_without_choices() {
        let result = parse_openai_response(r#"{"choices": []}"#);
        assert!(matches!(result, Err(LLMError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_complete_transport_error() {
        // Nothing listens on the discard port
        let config = OpenAIConfig::new("test-key").with_api_base("http://127.0.0.1:9/v1");
        let provider = OpenAIProvider::with_config(config).unwrap();
        let request = CompletionRequest::builder("m")
            .add_message(Message::user("hi"))
            .build();

        let result = provider.complete(request).await;
        assert!(matches!(result, Err(LLMError::HttpError(_))));
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason("stop"), StopReason::EndTurn);
        assert_eq!(map_stop_reason("length"), StopReason::MaxTokens);
        assert_eq!(map_stop_reason(""), StopReason::EndTurn);
    }
}
