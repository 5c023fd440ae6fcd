//! Submit and reset handlers.
//!
//! Handlers take the full current state and hand back the next state together
//! with everything a UI needs to redraw, so any event loop can drive them.

use crate::config::DEFAULT_TOKEN_LIMIT;
use crate::llm::completion::CompletionGateway;
use crate::llm::gateway::{CompletionConfig, Credential};
use crate::llm::models::LlmMessage;
use crate::session::state::ConversationState;
use crate::templates::PromptTemplateCatalog;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// One submit event from the UI.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub credential: Option<Credential>,
    pub input_text: String,
    pub template_label: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl SubmitRequest {
    /// A request with the default template and sampling parameters.
    pub fn new(input_text: impl Into<String>) -> Self {
        let config = CompletionConfig::default();
        Self {
            credential: None,
            input_text: input_text.into(),
            template_label: crate::templates::DEFAULT_TEMPLATE_LABEL.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_template(mut self, label: impl Into<String>) -> Self {
        self.template_label = label.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

/// The message input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub visible: bool,
}

/// Everything the UI redraws after a handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub input: InputField,
    pub transcript: Vec<(String, String)>,
    pub budget_message: String,
}

impl SessionView {
    fn cleared() -> Self {
        Self {
            input: InputField {
                value: String::new(),
                visible: true,
            },
            transcript: Vec::new(),
            budget_message: String::new(),
        }
    }
}

/// Result of a handler: what to show and the state to keep.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub view: SessionView,
    pub state: ConversationState,
}

pub struct SessionController {
    gateway: CompletionGateway,
    catalog: Arc<PromptTemplateCatalog>,
    token_limit: u64,
}

impl SessionController {
    pub fn new(gateway: CompletionGateway, catalog: Arc<PromptTemplateCatalog>) -> Self {
        Self {
            gateway,
            catalog,
            token_limit: DEFAULT_TOKEN_LIMIT,
        }
    }

    /// Set the token cap for sessions without their own credential (default: 3000)
    pub fn with_token_limit(mut self, token_limit: u64) -> Self {
        self.token_limit = token_limit;
        self
    }

    pub fn token_limit(&self) -> u64 {
        self.token_limit
    }

    pub fn catalog(&self) -> &PromptTemplateCatalog {
        &self.catalog
    }

    /// Instruction text to display for a selected template.
    pub fn template_preview(&self, label: &str) -> Option<String> {
        self.catalog.preview(label)
    }

    /// Run one submit cycle.
    ///
    /// Empty input makes no provider call. A failed call is recorded as a
    /// system-role `Error: ...` reply and costs nothing.
    pub async fn handle_submit(
        &self,
        request: SubmitRequest,
        mut state: ConversationState,
    ) -> SubmitOutcome {
        let credential = request.credential.as_ref();

        if request.input_text.is_empty() {
            debug!(session = %state.id(), "Ignoring empty submission");
            let view = self.render(&state, credential);
            return SubmitOutcome { view, state };
        }

        let instruction = match self.catalog.lookup(&request.template_label) {
            Some(instruction) => instruction,
            None => {
                warn!(
                    session = %state.id(),
                    template = %request.template_label,
                    "Unknown prompt template, sending without instruction"
                );
                ""
            }
        };
        let config = CompletionConfig::new(request.temperature, request.max_tokens).clamped();

        let result = self
            .gateway
            .complete(state.messages(), &request.input_text, instruction, &config, credential)
            .await;

        let user_message = LlmMessage::user(request.input_text.as_str());
        let (reply, tokens) = match result {
            Ok(completion) => {
                info!(
                    session = %state.id(),
                    tokens = completion.tokens_used,
                    "Completion succeeded"
                );
                (LlmMessage::assistant(completion.assistant_text), completion.tokens_used)
            }
            Err(e) => {
                info!(session = %state.id(), error = %e, "Recording failed completion in transcript");
                (LlmMessage::system(format!("Error: {}", e)), 0)
            }
        };

        if let Err(e) = state.append_exchange(user_message, reply) {
            // Both messages are built here with fixed roles.
            error!(session = %state.id(), error = %e, "Could not record exchange");
        }
        state.add_tokens(tokens);

        let view = self.render(&state, credential);
        SubmitOutcome { view, state }
    }

    /// Discard the session and start over.
    pub fn handle_reset(&self) -> SubmitOutcome {
        let state = ConversationState::empty();
        debug!(session = %state.id(), "Session reset");
        SubmitOutcome {
            view: SessionView::cleared(),
            state,
        }
    }

    fn render(&self, state: &ConversationState, credential: Option<&Credential>) -> SessionView {
        let budget_message = if credential.is_some() {
            String::new()
        } else {
            format!(
                "Total tokens used: {} / {}",
                state.total_tokens_used(),
                self.token_limit
            )
        };

        SessionView {
            input: InputField {
                value: String::new(),
                visible: credential.is_some() || state.is_under_budget(self.token_limit),
            },
            transcript: state
                .render_pairs()
                .map(|(q, a)| (q.to_string(), a.to_string()))
                .collect(),
            budget_message,
        }
    }
}
