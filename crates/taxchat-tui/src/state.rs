//! Application state composition.
//!
//! ```text
//! AppState
//! ├── session: SessionState      (current id, role, username)
//! ├── input: InputState          (message being typed)
//! ├── transcript: TranscriptState (cells, scroll)
//! ├── starters: StartersState    (suggestions before first send)
//! ├── send_state: SendState      (idle / awaiting-response)
//! └── queued_prompt              (submission made while awaiting)
//! ```
//!
//! The reducer in `update` is the only place this state mutates.

use taxchat_core::session::SessionState;

use crate::input::InputState;
use crate::starters::StartersState;
use crate::transcript::TranscriptState;

/// Send/receive flow state.
///
/// `Idle → AwaitingResponse` on a non-empty send, back to `Idle` on response
/// or error. There are no other states: no retry, no timeout, no
/// cancellation of the in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    /// No request in flight, ready for input.
    #[default]
    Idle,
    /// A message was relayed; the typing indicator is showing.
    AwaitingResponse,
}

impl SendState {
    /// Returns true if a request is in flight.
    pub fn is_awaiting(self) -> bool {
        matches!(self, SendState::AwaitingResponse)
    }
}

/// TUI application state.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Current session identity; re-assigned in place on reset.
    pub session: SessionState,
    /// User input state.
    pub input: InputState,
    /// Transcript display state (cells, scroll).
    pub transcript: TranscriptState,
    /// Starter suggestions panel.
    pub starters: StartersState,
    /// Send/receive flow state.
    pub send_state: SendState,
    /// Submission made while a request was in flight (latest wins); sent
    /// automatically once the response or error arrives.
    pub queued_prompt: Option<String>,
    /// Spinner animation frame counter (typing indicator).
    pub spinner_frame: usize,
}

impl AppState {
    /// Creates the initial state for a session.
    pub fn new(session: SessionState, starter_items: Vec<String>) -> Self {
        Self {
            should_quit: false,
            session,
            input: InputState::new(),
            transcript: TranscriptState::new(),
            starters: StartersState::new(starter_items),
            send_state: SendState::default(),
            queued_prompt: None,
            spinner_frame: 0,
        }
    }
}
