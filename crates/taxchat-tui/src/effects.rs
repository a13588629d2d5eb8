//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations), which
//! keeps the reducer pure: it mutates state and returns effects, never
//! performs network calls itself.

use taxchat_core::config::Role;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Register a session id with the backend.
    StartSession { session_id: String },

    /// Relay a message to the backend.
    SendMessage {
        session_id: String,
        text: String,
        role: Option<Role>,
    },

    /// Discard the old session on the backend and register the new one.
    ReplaceSession { old_id: String, new_id: String },
}
