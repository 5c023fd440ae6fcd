//! Error types and result aliases for Sydne.
//!
//! [`SydneError`] is the library-wide error and [`Result`] its alias. The
//! completion gateway narrows every provider failure into a [`GatewayError`],
//! which the session controller turns into a visible transcript entry.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SydneError {
    #[error("LLM gateway error: {0}")]
    GatewayError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Template catalog error: {0}")]
    CatalogError(String),

    #[error("Conversation state error: {0}")]
    StateError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, SydneError>;

/// A failed completion call, described for the person reading the transcript.
///
/// Unlike [`SydneError`], the display form carries no category prefix: the
/// controller renders it as `Error: {message}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SydneError> for GatewayError {
    fn from(err: SydneError) -> Self {
        let message = match err {
            SydneError::GatewayError(msg) | SydneError::ApiError(msg) => msg,
            SydneError::HttpError(e) if e.is_timeout() => "request timed out".to_string(),
            SydneError::HttpError(e) => e.to_string(),
            other => other.to_string(),
        };
        Self { message }
    }
}
