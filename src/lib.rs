//! Sydne: the conversation core of a hosted chat-completion front-end.
//!
//! A [`session::SessionController`] turns UI events into provider calls and
//! hands back the next [`session::ConversationState`] along with a redrawable
//! view. Sessions running on the default API key are capped at a token budget;
//! a user-supplied key lifts the cap.

pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod templates;

pub use error::{GatewayError, Result, SydneError};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{GatewayError, Result, SydneError};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::{CompletionConfig, CompletionGateway, Credential, LlmGateway, LlmMessage, MessageRole};
    pub use crate::session::{ConversationState, SessionController, SessionHandle, SessionView, SubmitRequest};
    pub use crate::templates::PromptTemplateCatalog;
}
