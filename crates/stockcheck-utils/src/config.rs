//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application-wide settings shared by every front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stockcheck".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Read `STOCKCHECK_ENV` on top of the defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: env_or("STOCKCHECK_ENV", &defaults.environment),
            ..defaults
        }
    }
}

/// Load a `.env` file from the working directory if one exists
///
/// Secrets such as `OPENROUTER_API_KEY` usually live there during
/// development. A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }
}

/// Read an environment variable, falling back to `default` when unset or blank
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse an environment variable; unset, blank or unparsable gives `None`
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "stockcheck");
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_env_or_falls_back_on_blank() {
        unsafe {
            std::env::set_var("STOCKCHECK_TEST_BLANK", "  ");
        }
        assert_eq!(env_or("STOCKCHECK_TEST_BLANK", "fallback"), "fallback");
        assert_eq!(env_or("STOCKCHECK_TEST_UNSET_KEY", "fallback"), "fallback");
        unsafe {
            std::env::remove_var("STOCKCHECK_TEST_BLANK");
        }
    }

    #[test]
    fn test_env_parse() {
        unsafe {
            std::env::set_var("STOCKCHECK_TEST_SECS", " 15 ");
            std::env::set_var("STOCKCHECK_TEST_BAD", "soon");
        }
        assert_eq!(env_parse::<u64>("STOCKCHECK_TEST_SECS"), Some(15));
        assert_eq!(env_parse::<u64>("STOCKCHECK_TEST_BAD"), None);
        unsafe {
            std::env::remove_var("STOCKCHECK_TEST_SECS");
            std::env::remove_var("STOCKCHECK_TEST_BAD");
        }
    }

    #[test]
    fn test_config_serialization() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["environment"], "development");
    }
}
