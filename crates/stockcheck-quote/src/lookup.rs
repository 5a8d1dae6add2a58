//! Company name to ticker resolution through an LLM

use crate::config::{DEFAULT_LOOKUP_MODEL, LookupConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockcheck_llm::providers::OpenAIProvider;
use stockcheck_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use tracing::{debug, error, instrument, warn};

const ERR_NO_KEY: &str = "API key not configured.";
const ERR_NO_NAME: &str = "Company name is required";
const ERR_NOT_FOUND: &str = "Could not find ticker symbol";

/// Result of a lookup, in the shape the JSON API returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerLookupResult {
    pub success: bool,
    pub ticker: Option<String>,
    pub error: Option<String>,
}

impl TickerLookupResult {
    pub fn found(ticker: impl Into<String>) -> Self {
        Self {
            success: true,
            ticker: Some(ticker.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            ticker: None,
            error: Some(error.into()),
        }
    }
}

/// Asks a chat model for the ticker of a company name
///
/// Without a provider every lookup fails with `"API key not configured."`.
#[derive(Clone)]
pub struct TickerLookup {
    provider: Option<Arc<dyn LLMProvider>>,
    model: String,
}

impl TickerLookup {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
        }
    }

    /// A lookup with no provider behind it
    pub fn disabled() -> Self {
        Self {
            provider: None,
            model: DEFAULT_LOOKUP_MODEL.to_string(),
        }
    }

    /// Build an OpenRouter-backed lookup; disabled when no key is configured
    pub fn from_config(config: &LookupConfig) -> Self {
        let Some(provider_config) = config.provider_config() else {
            error!("OpenRouter API key not found. Set OPENROUTER_API_KEY to enable company lookup.");
            return Self::disabled();
        };

        match OpenAIProvider::with_config(provider_config) {
            Ok(provider) => Self::new(Arc::new(provider), &config.model),
            Err(e) => {
                error!("Failed to create lookup provider: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Resolve a company name to a ticker
    #[instrument(skip(self))]
    pub async fn find_ticker(&self, company_name: &str) -> TickerLookupResult {
        let Some(provider) = &self.provider else {
            return TickerLookupResult::failed(ERR_NO_KEY);
        };

        let company_name = company_name.trim();
        if company_name.is_empty() {
            return TickerLookupResult::failed(ERR_NO_NAME);
        }

        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt(company_name)))
            .build();

        match provider.complete(request).await {
            Ok(response) => {
                let ticker = response
                    .message
                    .text()
                    .map(|t| t.trim().to_uppercase())
                    .unwrap_or_default();
                if ticker.is_empty() {
                    TickerLookupResult::failed(ERR_NOT_FOUND)
                } else {
                    debug!("{} resolved to {}", company_name, ticker);
                    TickerLookupResult::found(ticker)
                }
            }
            Err(e) if is_api_rejection(&e) => {
                warn!("Ticker lookup for {} rejected: {}", company_name, e);
                TickerLookupResult::failed(ERR_NOT_FOUND)
            }
            Err(e) => {
                warn!("Ticker lookup for {} failed: {}", company_name, e);
                TickerLookupResult::failed(e.to_string())
            }
        }
    }
}

fn prompt(company_name: &str) -> String {
    format!(
        "What is the stock ticker symbol for {company_name}? Only return the ticker symbol in capital letters, nothing else."
    )
}

/// Errors caused by the API answering, rather than the call failing
fn is_api_rejection(error: &LLMError) -> bool {
    matches!(
        error,
        LLMError::RequestFailed(_)
            | LLMError::AuthenticationFailed
            | LLMError::RateLimitExceeded(_)
            | LLMError::InvalidRequest(_)
            | LLMError::ModelNotFound(_)
            | LLMError::UnexpectedResponse(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use stockcheck_llm::{CompletionResponse, StopReason, TokenUsage};

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> stockcheck_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn answer(text: &str) -> stockcheck_llm::Result<CompletionResponse> {
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn lookup(provider: MockProvider) -> TickerLookup {
        TickerLookup::new(Arc::new(provider), "test-model")
    }

    #[tokio::test]
    async fn test_lookup_without_key() {
        let result = TickerLookup::disabled().find_ticker("Apple").await;
        assert_eq!(result, TickerLookupResult::failed("API key not configured."));
    }

    #[tokio::test]
    async fn test_lookup_requires_name() {
        let mut provider = MockProvider::new();
        provider.expect_complete().never();

        let result = lookup(provider).find_ticker("   ").await;

        assert_eq!(result.error.as_deref(), Some("Company name is required"));
    }

    #[tokio::test]
    async fn test_lookup_normalizes_answer() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|request| {
                request.model == "test-model"
                    && request.max_tokens.is_none()
                    && request.messages.len() == 1
                    && request.messages[0].content
                        == "What is the stock ticker symbol for Apple? Only return the ticker symbol in capital letters, nothing else."
            })
            .times(1)
            .returning(|_| answer("  aapl\n"));

        let result = lookup(provider).find_ticker(" Apple ").await;

        assert_eq!(result, TickerLookupResult::found("AAPL"));
    }

    #[tokio::test]
    async fn test_empty_answer_is_not_found() {
        let mut provider = MockProvider::new();
        provider.expect_complete().returning(|_| answer("   "));

        let result = lookup(provider).find_ticker("Nothing Inc").await;

        assert_eq!(result.error.as_deref(), Some("Could not find ticker symbol"));
    }

    #[tokio::test]
    async fn test_api_rejection_is_not_found() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::RateLimitExceeded("slow down".to_string())));

        let result = lookup(provider).find_ticker("Apple").await;

        assert_eq!(result, TickerLookupResult::failed("Could not find ticker symbol"));
    }

    #[tokio::test]
    async fn test_other_errors_carry_their_text() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::ConfigurationError("bad base".to_string())));

        let result = lookup(provider).find_ticker("Apple").await;

        assert_eq!(result.error.as_deref(), Some("Configuration error: bad base"));
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let lookup = TickerLookup::from_config(&LookupConfig::default());
        assert!(!lookup.is_configured());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = LookupConfig::default().with_api_key("sk-or-test");
        let lookup = TickerLookup::from_config(&config);

        assert!(lookup.is_configured());
        assert_eq!(lookup.model(), DEFAULT_LOOKUP_MODEL);
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(TickerLookupResult::failed("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["ticker"].is_null());
        assert_eq!(json["error"], "nope");
    }
}
