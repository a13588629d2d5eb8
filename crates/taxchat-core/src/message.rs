//! Chat message model.
//!
//! Messages live only in the in-memory transcript; there is no persistence.

use chrono::Local;

/// Text shown by the transient typing indicator.
pub const TYPING_TEXT: &str = "Typing...";

/// Inline assistant message shown when a send fails.
pub const SEND_FAILURE_TEXT: &str = "Something went wrong. Please try again.";

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// A single chat message.
///
/// The typing indicator is an assistant message with `is_typing` set; it is
/// removed from the transcript once the real response (or an error) arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
    pub is_typing: bool,
    /// Local wall-clock time at creation, preformatted for display.
    pub timestamp: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
            is_typing: false,
            timestamp: local_timestamp(),
        }
    }

    /// Creates a finalized assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            content: content.into(),
            is_typing: false,
            timestamp: local_timestamp(),
        }
    }

    /// Creates the transient typing indicator.
    pub fn typing() -> Self {
        Self {
            speaker: Speaker::Assistant,
            content: TYPING_TEXT.to_string(),
            is_typing: true,
            timestamp: local_timestamp(),
        }
    }
}

/// Formats the current local time the way the transcript displays it.
fn local_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_message_is_assistant_and_transient() {
        let msg = ChatMessage::typing();
        assert_eq!(msg.speaker, Speaker::Assistant);
        assert!(msg.is_typing);
        assert_eq!(msg.content, TYPING_TEXT);
    }

    #[test]
    fn test_user_message_carries_timestamp() {
        let msg = ChatMessage::user("hello");
        assert!(!msg.is_typing);
        // HH:MM:SS
        assert_eq!(msg.timestamp.len(), 8);
        assert_eq!(msg.timestamp.matches(':').count(), 2);
    }
}
