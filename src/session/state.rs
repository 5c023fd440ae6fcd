//! Conversation state for one session.
//!
//! The message log is append-only and grows by whole exchanges: a user message
//! followed by either the assistant's reply or a system-role error marker.

use crate::error::{Result, SydneError};
use crate::llm::models::{LlmMessage, MessageRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    id: Uuid,
    messages: Vec<LlmMessage>,
    total_tokens_used: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConversationState {
    /// A new session with no messages and nothing spent.
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            total_tokens_used: 0,
        }
    }

    /// Append one exchange.
    ///
    /// The state is left untouched if either message has the wrong role.
    pub fn append_exchange(&mut self, user: LlmMessage, reply: LlmMessage) -> Result<()> {
        if user.role != MessageRole::User {
            return Err(SydneError::StateError(format!(
                "exchange must open with a user message, got {:?}",
                user.role
            )));
        }
        if !matches!(reply.role, MessageRole::Assistant | MessageRole::System) {
            return Err(SydneError::StateError(format!(
                "exchange reply must be an assistant or system message, got {:?}",
                reply.role
            )));
        }

        self.messages.push(user);
        self.messages.push(reply);
        Ok(())
    }

    pub fn add_tokens(&mut self, tokens: u64) {
        self.total_tokens_used = self.total_tokens_used.saturating_add(tokens);
    }

    /// `(user text, reply text)` for every complete exchange, oldest first.
    ///
    /// A trailing unpaired message is not rendered.
    pub fn render_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.messages
            .chunks_exact(2)
            .map(|pair| (pair[0].content.as_str(), pair[1].content.as_str()))
    }

    pub fn is_under_budget(&self, limit: u64) -> bool {
        self.total_tokens_used < limit
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    pub fn total_tokens_used(&self) -> u64 {
        self.total_tokens_used
    }

    pub fn exchange_count(&self) -> usize {
        self.messages.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(exchanges: &[(&str, &str)]) -> ConversationState {
        let mut state = ConversationState::empty();
        for (q, a) in exchanges {
            state.append_exchange(LlmMessage::user(*q), LlmMessage::assistant(*a)).unwrap();
        }
        state
    }

    #[test]
    fn test_empty_state() {
        let state = ConversationState::empty();
        assert!(state.messages().is_empty());
        assert_eq!(state.total_tokens_used(), 0);
        assert_eq!(state.render_pairs().count(), 0);
    }

    #[test]
    fn test_empty_states_have_distinct_ids() {
        assert_ne!(ConversationState::empty().id(), ConversationState::empty().id());
    }

    #[test]
    fn test_append_exchange_keeps_order() {
        let state = state_with(&[("Hello", "Hi there!"), ("How are you?", "Fine.")]);

        assert_eq!(state.messages().len(), 4);
        assert_eq!(state.messages()[0], LlmMessage::user("Hello"));
        assert_eq!(state.messages()[1], LlmMessage::assistant("Hi there!"));
        assert_eq!(state.messages()[3], LlmMessage::assistant("Fine."));
        assert_eq!(state.exchange_count(), 2);
    }

    #[test]
    fn test_append_exchange_accepts_system_error_marker() {
        let mut state = ConversationState::empty();
        state
            .append_exchange(LlmMessage::user("Hello"), LlmMessage::system("Error: timeout"))
            .unwrap();

        assert_eq!(state.messages()[1].role, MessageRole::System);
    }

    #[test]
    fn test_append_exchange_rejects_wrong_roles() {
        let mut state = ConversationState::empty();

        let err = state.append_exchange(LlmMessage::assistant("x"), LlmMessage::assistant("y"));
        assert!(matches!(err, Err(SydneError::StateError(_))));

        let err = state.append_exchange(LlmMessage::user("x"), LlmMessage::user("y"));
        assert!(matches!(err, Err(SydneError::StateError(_))));

        assert!(state.messages().is_empty());
    }

    #[test]
    fn test_add_tokens_accumulates() {
        let mut state = ConversationState::empty();
        state.add_tokens(12);
        state.add_tokens(30);
        state.add_tokens(0);
        assert_eq!(state.total_tokens_used(), 42);
    }

    #[test]
    fn test_add_tokens_saturates() {
        let mut state = ConversationState::empty();
        state.add_tokens(u64::MAX);
        state.add_tokens(5);
        assert_eq!(state.total_tokens_used(), u64::MAX);
    }

    #[test]
    fn test_render_pairs_matches_exchanges() {
        let exchanges = [("a", "1"), ("b", "2"), ("c", "3")];
        let state = state_with(&exchanges);

        let pairs: Vec<_> = state.render_pairs().collect();
        assert_eq!(pairs, exchanges.to_vec());
    }

    #[test]
    fn test_render_pairs_is_restartable() {
        let state = state_with(&[("a", "1"), ("b", "2")]);
        assert_eq!(state.render_pairs().count(), 2);
        assert_eq!(state.render_pairs().count(), 2);
    }

    #[test]
    fn test_render_pairs_omits_trailing_message() {
        let state: ConversationState = serde_json::from_value(serde_json::json!({
            "id": "6f1c1b6e-7a52-4b8e-9a3f-1d2a3b4c5d6e",
            "messages": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi there!"},
                {"role": "user", "content": "dangling"}
            ],
            "total_tokens_used": 12
        }))
        .unwrap();

        let pairs: Vec<_> = state.render_pairs().collect();
        assert_eq!(pairs, vec![("Hello", "Hi there!")]);
    }

    #[test]
    fn test_is_under_budget() {
        let mut state = ConversationState::empty();
        assert!(state.is_under_budget(3000));

        state.add_tokens(2999);
        assert!(state.is_under_budget(3000));

        state.add_tokens(1);
        assert!(!state.is_under_budget(3000));
    }

    #[test]
    fn test_state_serde_round_trip_preserves_session() {
        let mut state = state_with(&[("Hello", "Hi there!")]);
        state.add_tokens(12);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
