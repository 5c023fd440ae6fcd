//! Shared handle to one live session.
//!
//! A UI that can fire events concurrently holds a [`SessionHandle`]. Only one
//! submit runs at a time; a submit arriving while another is awaiting the
//! provider is dropped.

use crate::session::controller::{SessionController, SessionView, SubmitRequest};
use crate::session::state::ConversationState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingCompletion,
}

pub struct SessionHandle {
    controller: Arc<SessionController>,
    state: Mutex<ConversationState>,
    busy: AtomicBool,
}

/// Clears the busy flag however the submit future ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SessionHandle {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self {
            controller,
            state: Mutex::new(ConversationState::empty()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.busy.load(Ordering::SeqCst) {
            SessionPhase::AwaitingCompletion
        } else {
            SessionPhase::Idle
        }
    }

    /// Run a submit, or return `None` if one is already in flight.
    pub async fn submit(&self, request: SubmitRequest) -> Option<SessionView> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Submit ignored while a completion is in flight");
            return None;
        }
        let _guard = BusyGuard(&self.busy);

        // Work on a copy; the stored state changes only once the submit
        // completes, so a cancelled submit leaves it untouched.
        let mut state = self.state.lock().await;
        let outcome = self.controller.handle_submit(request, state.clone()).await;
        *state = outcome.state;
        Some(outcome.view)
    }

    /// Start a fresh conversation.
    ///
    /// Waits for an in-flight submit to finish first.
    pub async fn reset(&self) -> SessionView {
        let mut state = self.state.lock().await;
        let outcome = self.controller.handle_reset();
        *state = outcome.state;
        outcome.view
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ConversationState {
        self.state.lock().await.clone()
    }
}
