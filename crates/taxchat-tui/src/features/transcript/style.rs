//! UI-agnostic styled text and wrapping helpers.
//!
//! Transcript cells produce `StyledLine`s; the renderer translates the
//! semantic `Style` variants to terminal styles. This keeps cell and
//! markdown code free of ratatui types and unit-testable.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Semantic style identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No styling.
    Plain,
    /// User message prefix ("You: ").
    UserPrefix,
    /// User message content.
    User,
    /// Assistant message content.
    Assistant,
    /// Bold (markdown strong).
    Bold,
    /// Italic (markdown emphasis).
    Emphasis,
    /// Inline code or code block.
    Code,
    /// Markdown heading.
    Heading,
    /// List bullet / ordered index.
    Bullet,
    /// Table borders and separators.
    TableBorder,
    /// Typing indicator.
    Typing,
    /// Per-message timestamp.
    Timestamp,
}

/// A styled span of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A line of styled spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Creates an empty line.
    pub fn empty() -> Self {
        StyledLine { spans: vec![] }
    }

    /// Creates a line from a single span.
    pub fn single(text: impl Into<String>, style: Style) -> Self {
        StyledLine {
            spans: vec![StyledSpan::new(text, style)],
        }
    }

    /// Concatenated text of the line (tests and width checks).
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Wraps plain text to fit within the given display width.
///
/// Greedy word wrap using display width; a single word wider than the line
/// is hard-split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_width = word.width();
        let current_width = current.width();

        if current.is_empty() {
            if word_width <= width {
                current.push_str(word);
            } else {
                hard_split(word, width, &mut lines, &mut current);
            }
        } else if current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            if word_width <= width {
                current.push_str(word);
            } else {
                hard_split(word, width, &mut lines, &mut current);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Splits an over-long word into width-sized chunks; the last chunk stays in
/// `current` so following words can join it.
fn hard_split(word: &str, width: usize, lines: &mut Vec<String>, current: &mut String) {
    let mut chunk = String::new();
    for ch in word.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if chunk.width() + ch_width > width && !chunk.is_empty() {
            lines.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    *current = chunk;
}

/// Wraps a sequence of styled spans, preserving per-word styles.
///
/// Words keep the style of the span they came from; inter-word spacing is
/// plain. Used by the markdown renderer where a logical line mixes styles.
pub fn wrap_styled_spans(spans: &[StyledSpan], width: usize) -> Vec<StyledLine> {
    if width == 0 {
        return vec![StyledLine {
            spans: spans.to_vec(),
        }];
    }

    // Tokenize into styled words.
    let mut words: Vec<StyledSpan> = Vec::new();
    for span in spans {
        for word in span.text.split_whitespace() {
            words.push(StyledSpan::new(word, span.style));
        }
    }

    let mut lines = Vec::new();
    let mut current: Vec<StyledSpan> = Vec::new();
    let mut current_width = 0usize;

    for word in words {
        let word_width = word.text.width();
        let needed = if current.is_empty() {
            word_width
        } else {
            current_width + 1 + word_width
        };

        if needed > width && !current.is_empty() {
            lines.push(StyledLine {
                spans: std::mem::take(&mut current),
            });
            current_width = 0;
        }

        if !current.is_empty() {
            current.push(StyledSpan::new(" ", Style::Plain));
            current_width += 1;
        }
        current_width += word_width;
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(StyledLine { spans: current });
    }
    if lines.is_empty() {
        lines.push(StyledLine::empty());
    }
    lines
}

/// Renders content with a prefix, handling line wrapping.
///
/// The prefix appears on the first line; subsequent wrapped lines are
/// indented to align with the content start.
pub fn render_prefixed_content(
    prefix: &str,
    content: &str,
    width: usize,
    prefix_style: Style,
    content_style: Style,
) -> Vec<StyledLine> {
    let mut lines = Vec::new();
    let prefix_width = prefix.width();

    // Minimum usable width
    let effective_width = width.max(prefix_width + 10);
    let content_width = effective_width - prefix_width;

    let mut is_first_line = true;

    for paragraph in content.split('\n') {
        if paragraph.is_empty() {
            lines.push(StyledLine::empty());
            continue;
        }

        for wrapped in wrap_text(paragraph, content_width) {
            let lead = if is_first_line {
                is_first_line = false;
                StyledSpan::new(prefix, prefix_style)
            } else {
                StyledSpan::new(" ".repeat(prefix_width), Style::Plain)
            };
            lines.push(StyledLine {
                spans: vec![lead, StyledSpan::new(wrapped, content_style)],
            });
        }
    }

    // Handle empty content
    if lines.is_empty() {
        lines.push(StyledLine::single(prefix, prefix_style));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_short_line_unchanged() {
        assert_eq!(wrap_text("hello world", 40), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_text_breaks_at_word_boundary() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_text_hard_splits_long_word() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_styled_spans_preserves_styles() {
        let spans = vec![
            StyledSpan::new("plain and", Style::Assistant),
            StyledSpan::new("bold", Style::Bold),
        ];
        let lines = wrap_styled_spans(&spans, 40);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "plain and bold");
        assert!(lines[0].spans.iter().any(|s| s.style == Style::Bold));
    }

    #[test]
    fn test_prefixed_content_indents_continuations() {
        let lines =
            render_prefixed_content("You: ", "a b c d e f", 10, Style::UserPrefix, Style::User);
        assert!(lines.len() > 1);
        assert!(lines[0].text().starts_with("You: "));
        assert!(lines[1].text().starts_with("     "));
    }
}
