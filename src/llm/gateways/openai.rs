//! OpenAI gateway for chat completions.
//!
//! Talks to any endpoint that speaks the OpenAI `/chat/completions` protocol.

use crate::config::AppConfig;
use crate::error::{Result, SydneError};
use crate::llm::gateway::{CompletionConfig, Credential, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for connecting to the OpenAI API.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Process-wide default key, used when a call carries no credential.
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

impl From<&AppConfig> for OpenAIConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            timeout: config.request_timeout,
        }
    }
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gateway for the OpenAI chat-completions service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| SydneError::ConfigError(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: None,
        })
    }

    fn build_body(model: &str, messages: &[LlmMessage], config: &CompletionConfig) -> Result<Value> {
        Ok(serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        }))
    }

    fn api_key<'a>(&'a self, credential: Option<&'a Credential>) -> &'a str {
        credential.map(Credential::expose).unwrap_or(&self.config.api_key)
    }
}

/// Turn a non-success body into a readable message, preferring the provider's
/// own `error.message` when the body carries one.
fn describe_error_body(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| format!("{} - {}", status, body))
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
        credential: Option<&Credential>,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI for completion");
        debug!(
            model = model,
            message_count = messages.len(),
            user_credential = credential.is_some(),
            "Building chat completion request"
        );

        let body = Self::build_body(model, messages, config)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.api_key(credential))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SydneError::ApiError(describe_error_body(status, &error_text)));
        }

        let response_body: Value = response.json().await?;

        let content = response_body["choices"][0]["message"]["content"].as_str().map(String::from);

        let usage = match response_body.get("usage") {
            Some(usage) if !usage.is_null() => Some(serde_json::from_value::<TokenUsage>(usage.clone())?),
            _ => None,
        };

        debug!(total_tokens = usage.map(|u| u.total_tokens), "Completion received");

        Ok(LlmGatewayResponse { content, usage })
    }
}
