//! Configuration for quote fetching and ticker lookup

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stockcheck_llm::providers::{OPENROUTER_API_BASE, OpenAIConfig};
use stockcheck_utils::{env_or, env_parse};
use url::Url;

const DEFAULT_FINVIZ_BASE_URL: &str = "https://finviz.com/";
const DEFAULT_CHARTS_BASE_URL: &str = "https://charts2.finviz.com/";
// Finviz rejects requests without a browser-like agent
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Model asked to resolve company names
pub const DEFAULT_LOOKUP_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";
/// Sent as `HTTP-Referer` so OpenRouter can attribute the app
pub const DEFAULT_REFERER: &str = "https://github.com/pranay784/stockcheck";

/// Configuration for the quote provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Root of the quote site (`quote.ashx` is resolved against it)
    pub finviz_base_url: String,

    /// Root of the chart image host
    pub charts_base_url: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Request timeout. `None` keeps the HTTP client's default behaviour.
    pub request_timeout: Option<Duration>,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            finviz_base_url: DEFAULT_FINVIZ_BASE_URL.to_string(),
            charts_base_url: DEFAULT_CHARTS_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }
}

impl QuoteConfig {
    /// Create a new configuration builder
    pub fn builder() -> QuoteConfigBuilder {
        QuoteConfigBuilder::default()
    }

    /// Defaults overridden by `FINVIZ_BASE_URL` and `STOCKCHECK_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("finviz_base_url", &self.finviz_base_url),
            ("charts_base_url", &self.charts_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| StockError::ConfigError(format!("{name} '{value}' is not a URL: {e}")))?;
        }

        if self.user_agent.trim().is_empty() {
            return Err(StockError::ConfigError(
                "user_agent must not be empty".to_string(),
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for QuoteConfig
#[derive(Debug, Default)]
pub struct QuoteConfigBuilder {
    finviz_base_url: Option<String>,
    charts_base_url: Option<String>,
    user_agent: Option<String>,
    request_timeout: Option<Duration>,
}

impl QuoteConfigBuilder {
    /// Set the quote site root
    pub fn finviz_base_url(mut self, url: impl Into<String>) -> Self {
        self.finviz_base_url = Some(url.into());
        self
    }

    /// Set the chart image host root
    pub fn charts_base_url(mut self, url: impl Into<String>) -> Self {
        self.charts_base_url = Some(url.into());
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Pick up overrides from the environment
    pub fn with_env(mut self) -> Self {
        if let Some(url) = env_parse::<String>("FINVIZ_BASE_URL").filter(|u| !u.is_empty()) {
            self.finviz_base_url = Some(url);
        }
        if let Some(secs) = env_parse::<u64>("STOCKCHECK_HTTP_TIMEOUT_SECS") {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<QuoteConfig> {
        let defaults = QuoteConfig::default();

        let config = QuoteConfig {
            finviz_base_url: self.finviz_base_url.unwrap_or(defaults.finviz_base_url),
            charts_base_url: self.charts_base_url.unwrap_or(defaults.charts_base_url),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            request_timeout: self.request_timeout.or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration for the LLM ticker lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// OpenRouter API key; lookups are disabled without one
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API root
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// `HTTP-Referer` header value
    pub referer: String,

    /// Request timeout in seconds. `None` keeps the client default.
    pub timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: OPENROUTER_API_BASE.to_string(),
            model: DEFAULT_LOOKUP_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout_secs: None,
        }
    }
}

impl LookupConfig {
    /// Read `OPENROUTER_API_KEY`, `OPENROUTER_API_BASE` and `OPENROUTER_MODEL`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: env_parse::<String>("OPENROUTER_API_KEY").filter(|k| !k.is_empty()),
            api_base: env_or("OPENROUTER_API_BASE", &defaults.api_base),
            model: env_or("OPENROUTER_MODEL", &defaults.model),
            referer: defaults.referer,
            timeout_secs: env_parse("STOCKCHECK_HTTP_TIMEOUT_SECS"),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Provider configuration, or `None` when no key is configured
    pub fn provider_config(&self) -> Option<OpenAIConfig> {
        let key = self.api_key.as_deref()?;
        let mut config = OpenAIConfig::new(key)
            .with_api_base(&self.api_base)
            .with_header("HTTP-Referer", &self.referer);
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(secs);
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuoteConfig::default();
        assert_eq!(config.finviz_base_url, "https://finviz.com/");
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = QuoteConfig::builder()
            .finviz_base_url("http://127.0.0.1:8080/")
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.finviz_base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.charts_base_url, DEFAULT_CHARTS_BASE_URL);
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let result = QuoteConfig::builder().finviz_base_url("not a url").build();
        assert!(matches!(result, Err(StockError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = QuoteConfig {
            request_timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lookup_without_key_has_no_provider() {
        let config = LookupConfig::default();
        assert!(config.provider_config().is_none());
    }

    #[test]
    fn test_lookup_provider_config() {
        let config = LookupConfig::default().with_api_key("sk-or-test");
        let provider = config.provider_config().unwrap();

        assert_eq!(provider.api_key, "sk-or-test");
        assert_eq!(provider.api_base, OPENROUTER_API_BASE);
        assert_eq!(provider.api_base, "https://openrouter.ai/api/v1");
        assert!(
            provider
                .extra_headers
                .iter()
                .any(|(name, value)| name == "HTTP-Referer" && value == DEFAULT_REFERER)
        );
    }

    #[test]
    fn test_lookup_key_not_serialized() {
        let config = LookupConfig::default().with_api_key("secret");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("api_key").is_none());
        assert_eq!(json["model"], DEFAULT_LOOKUP_MODEL);
    }

    #[test]
    fn test_lookup_from_env_ignores_blank_values() {
        unsafe {
            std::env::set_var("OPENROUTER_API_KEY", "");
            std::env::set_var("OPENROUTER_API_BASE", "  ");
        }

        let config = LookupConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_base, OPENROUTER_API_BASE);

        unsafe {
            std::env::remove_var("OPENROUTER_API_KEY");
            std::env::remove_var("OPENROUTER_API_BASE");
        }
    }
}
