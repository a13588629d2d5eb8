//! Transcript cells and their display rendering.
//!
//! A cell wraps one `ChatMessage`. Cells are width-agnostic; `display_lines`
//! wraps for the current terminal width at render time. User messages render
//! with the `You: ` prefix; assistant messages route through the markdown
//! heuristics; the typing indicator renders with a spinner.

use std::sync::atomic::{AtomicU64, Ordering};

use taxchat_core::message::{ChatMessage, Speaker};
use taxchat_core::textflow::{self, LineBlock};

use super::markdown::render_markdown;
use super::style::{Style, StyledLine, StyledSpan, render_prefixed_content, wrap_text};

/// Global counter for generating unique cell IDs.
static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a transcript cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub u64);

impl CellId {
    /// Generates a new unique cell ID.
    pub fn new() -> Self {
        CellId(CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner frames for the typing indicator.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A rendered message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptCell {
    pub id: CellId,
    pub message: ChatMessage,
}

impl TranscriptCell {
    pub fn new(message: ChatMessage) -> Self {
        Self {
            id: CellId::new(),
            message,
        }
    }

    /// Returns true if this is the transient typing indicator.
    pub fn is_typing(&self) -> bool {
        self.message.is_typing
    }

    /// Renders the cell for the given display width.
    pub fn display_lines(&self, width: usize, spinner_frame: usize) -> Vec<StyledLine> {
        let mut lines = match self.message.speaker {
            Speaker::User => render_prefixed_content(
                "You: ",
                &self.message.content,
                width,
                Style::UserPrefix,
                Style::User,
            ),
            Speaker::Assistant if self.message.is_typing => {
                let frame = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
                vec![StyledLine {
                    spans: vec![
                        StyledSpan::new(format!("{frame} "), Style::Typing),
                        StyledSpan::new(self.message.content.clone(), Style::Typing),
                    ],
                }]
            }
            Speaker::Assistant => render_assistant_content(&self.message.content, width),
        };

        lines.push(StyledLine::single(
            self.message.timestamp.clone(),
            Style::Timestamp,
        ));
        lines
    }
}

/// Assistant content: markdown when the heuristics fire, line blocks
/// otherwise.
fn render_assistant_content(content: &str, width: usize) -> Vec<StyledLine> {
    if textflow::looks_like_markdown(content) {
        return render_markdown(content, width);
    }

    let mut lines = Vec::new();
    for block in textflow::normalize_plain_lines(content) {
        match block {
            LineBlock::Text(text) => {
                for wrapped in wrap_text(&text, width.max(8)) {
                    lines.push(StyledLine::single(wrapped, Style::Assistant));
                }
            }
            LineBlock::Break => lines.push(StyledLine::empty()),
        }
    }
    if lines.is_empty() {
        lines.push(StyledLine::empty());
    }
    lines
}

#[cfg(test)]
mod tests {
    use taxchat_core::message::TYPING_TEXT;

    use super::*;

    fn texts(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::text).collect()
    }

    #[test]
    fn test_user_cell_renders_you_prefix() {
        let cell = TranscriptCell::new(ChatMessage::user("Hello"));
        let lines = cell.display_lines(80, 0);
        assert!(lines[0].text().starts_with("You: Hello"));
    }

    #[test]
    fn test_typing_cell_shows_typing_text() {
        let cell = TranscriptCell::new(ChatMessage::typing());
        let lines = cell.display_lines(80, 3);
        assert!(lines[0].text().ends_with(TYPING_TEXT));
    }

    #[test]
    fn test_every_cell_ends_with_timestamp_line() {
        for cell in [
            TranscriptCell::new(ChatMessage::user("q")),
            TranscriptCell::new(ChatMessage::assistant("a")),
            TranscriptCell::new(ChatMessage::typing()),
        ] {
            let lines = cell.display_lines(80, 0);
            let last = lines.last().unwrap();
            assert_eq!(last.spans.len(), 1);
            assert_eq!(last.spans[0].style, Style::Timestamp);
        }
    }

    #[test]
    fn test_plain_assistant_content_collapses_blank_runs() {
        let cell = TranscriptCell::new(ChatMessage::assistant("a\n\n\nb"));
        let lines = cell.display_lines(80, 0);
        // a, single break, b, timestamp
        let rendered = texts(&lines);
        assert_eq!(rendered.len(), 4);
        assert_eq!(&rendered[..3], ["a", "", "b"]);
    }

    #[test]
    fn test_markdown_assistant_content_routes_to_markdown() {
        let cell = TranscriptCell::new(ChatMessage::assistant("- one\n- two"));
        let lines = cell.display_lines(80, 0);
        assert!(
            lines
                .iter()
                .flat_map(|l| &l.spans)
                .any(|s| s.style == Style::Bullet)
        );
    }

    #[test]
    fn test_cell_ids_are_unique() {
        let a = TranscriptCell::new(ChatMessage::user("x"));
        let b = TranscriptCell::new(ChatMessage::user("x"));
        assert_ne!(a.id, b.id);
    }
}
