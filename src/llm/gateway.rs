use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use std::fmt;
use std::ops::RangeInclusive;
use tracing::warn;

/// Accepted sampling temperature range
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

/// Accepted per-response token limit range
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 100..=4096;

/// Sampling parameters for one completion call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl CompletionConfig {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }

    pub fn is_valid(&self) -> bool {
        TEMPERATURE_RANGE.contains(&self.temperature) && MAX_TOKENS_RANGE.contains(&self.max_tokens)
    }

    /// Pull both parameters into their accepted ranges.
    ///
    /// A NaN temperature falls back to the default.
    pub fn clamped(self) -> Self {
        if self.is_valid() {
            return self;
        }

        let temperature = if self.temperature.is_nan() {
            Self::default().temperature
        } else {
            self.temperature.clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end())
        };
        let max_tokens = self.max_tokens.clamp(*MAX_TOKENS_RANGE.start(), *MAX_TOKENS_RANGE.end());

        warn!(
            requested_temperature = self.temperature,
            requested_max_tokens = self.max_tokens,
            temperature,
            max_tokens,
            "Sampling parameters out of range, clamping"
        );

        Self {
            temperature,
            max_tokens,
        }
    }
}

/// A provider API key supplied by the user for their own session.
///
/// The key is never printed by `Debug`, and is never blank: a blank key
/// means "no credential", so the shared key and the token cap apply.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trimmed key, or `None` when the key is blank.
    pub fn new(key: impl AsRef<str>) -> Option<Self> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// Interpret raw UI input.
    pub fn from_input(input: Option<&str>) -> Option<Self> {
        input.and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Abstract interface for chat-completion providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete a chat request.
    ///
    /// `credential` overrides the provider's configured key for this call only.
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
        credential: Option<&Credential>,
    ) -> Result<LlmGatewayResponse>;
}
