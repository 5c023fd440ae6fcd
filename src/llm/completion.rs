use crate::error::{GatewayError, SydneError};
use crate::llm::gateway::{CompletionConfig, Credential, LlmGateway};
use crate::llm::models::LlmMessage;
use std::sync::Arc;
use tracing::{debug, warn};

/// A successful completion: the reply and what it cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub assistant_text: String,
    pub tokens_used: u64,
}

/// Formats a conversation turn for the provider and normalizes its outcome.
pub struct CompletionGateway {
    model: String,
    gateway: Arc<dyn LlmGateway>,
}

impl CompletionGateway {
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Outgoing message sequence: instruction (if any), history, new user message.
    pub fn build_messages(
        history: &[LlmMessage],
        new_user_text: &str,
        instruction_text: &str,
    ) -> Vec<LlmMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !instruction_text.is_empty() {
            messages.push(LlmMessage::system(instruction_text));
        }
        messages.extend_from_slice(history);
        messages.push(LlmMessage::user(new_user_text));
        messages
    }

    /// Run one completion. Every failure comes back as a [`GatewayError`].
    pub async fn complete(
        &self,
        history: &[LlmMessage],
        new_user_text: &str,
        instruction_text: &str,
        config: &CompletionConfig,
        credential: Option<&Credential>,
    ) -> Result<Completion, GatewayError> {
        let messages = Self::build_messages(history, new_user_text, instruction_text);
        debug!(
            model = %self.model,
            message_count = messages.len(),
            has_instruction = !instruction_text.is_empty(),
            "Requesting completion"
        );

        let response = self
            .gateway
            .complete(&self.model, &messages, config, credential)
            .await
            .map_err(|e| {
                warn!(error = %e, "Completion call failed");
                GatewayError::from(e)
            })?;

        let assistant_text = response.content.ok_or_else(|| {
            GatewayError::from(SydneError::GatewayError("response carried no message content".to_string()))
        })?;
        let usage = response.usage.ok_or_else(|| {
            GatewayError::from(SydneError::GatewayError("response carried no token usage".to_string()))
        })?;

        Ok(Completion {
            assistant_text,
            tokens_used: usage.total_tokens,
        })
    }
}
