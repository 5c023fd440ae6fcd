pub mod controller;
pub mod handle;
pub mod state;

pub use controller::{InputField, SessionController, SessionView, SubmitOutcome, SubmitRequest};
pub use handle::{SessionHandle, SessionPhase};
pub use state::ConversationState;
