//! Process configuration, read once at start-up.
//!
//! Values come from the environment, after an optional `.env` file has been
//! loaded. Anything unset falls back to the defaults below.

use crate::error::{Result, SydneError};
use crate::llm::gateways::openai::DEFAULT_BASE_URL;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPLATES_URL: &str =
    "https://raw.githubusercontent.com/f/awesome-chatgpt-prompts/main/prompts.csv";
pub const DEFAULT_TOKEN_LIMIT: u64 = 3000;

#[derive(Clone)]
pub struct AppConfig {
    /// Default provider key used when the user supplies none.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub templates_url: String,
    /// Per-session token cap for sessions running on the default key.
    pub token_limit: u64,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            templates_url: DEFAULT_TEMPLATES_URL.to_string(),
            token_limit: DEFAULT_TOKEN_LIMIT,
            request_timeout: None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "***" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("templates_url", &self.templates_url)
            .field("token_limit", &self.token_limit)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: lookup("OPENAI_API_KEY").unwrap_or(defaults.api_key),
            base_url: non_empty("OPENAI_API_ENDPOINT").unwrap_or(defaults.base_url),
            model: non_empty("SYDNE_MODEL").unwrap_or(defaults.model),
            templates_url: non_empty("SYDNE_TEMPLATES_URL").unwrap_or(defaults.templates_url),
            token_limit: parse_var("SYDNE_TOKEN_LIMIT", non_empty("SYDNE_TOKEN_LIMIT"))?
                .unwrap_or(defaults.token_limit),
            request_timeout: parse_var::<u64>(
                "SYDNE_REQUEST_TIMEOUT_SECS",
                non_empty("SYDNE_REQUEST_TIMEOUT_SECS"),
            )?
            .map(Duration::from_secs),
        })
    }

    pub fn has_default_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| SydneError::ConfigError(format!("{} is not a valid number: {:?}", key, value)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_key, "");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.token_limit, 3000);
        assert!(config.request_timeout.is_none());
        assert!(!config.has_default_key());
    }

    #[test]
    fn test_values_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-default"),
            ("OPENAI_API_ENDPOINT", "http://localhost:8080/v1"),
            ("SYDNE_MODEL", "gpt-4o-mini"),
            ("SYDNE_TOKEN_LIMIT", "5000"),
            ("SYDNE_REQUEST_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();

        assert_eq!(config.api_key, "sk-default");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.token_limit, 5000);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
        assert!(config.has_default_key());
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SYDNE_MODEL", "  "),
            ("SYDNE_TOKEN_LIMIT", ""),
        ]))
        .unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.token_limit, DEFAULT_TOKEN_LIMIT);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("SYDNE_TOKEN_LIMIT", "lots")]));
        match result {
            Err(SydneError::ConfigError(msg)) => assert!(msg.contains("SYDNE_TOKEN_LIMIT")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AppConfig {
            api_key: "sk-secret".to_string(),
            ..AppConfig::default()
        };
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
