pub mod completion;
pub mod gateway;
pub mod gateways;
pub mod models;

pub use completion::{Completion, CompletionGateway};
pub use gateway::{CompletionConfig, Credential, LlmGateway};
pub use models::{LlmGatewayResponse, LlmMessage, MessageRole, TokenUsage};
