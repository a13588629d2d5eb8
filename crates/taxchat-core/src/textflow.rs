//! Assistant content classification and plain-text normalization.
//!
//! Responses are either rendered as markdown or as normalized line blocks.
//! The markdown check is a heuristic, not a parse: it fires on the three
//! shapes the backend actually produces (tables, bold runs, bullet lists).

/// A normalized block of plain-text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineBlock {
    /// A non-empty line, rendered as its own block.
    Text(String),
    /// An explicit blank line between blocks.
    Break,
}

/// Returns true if the content should be routed to markdown rendering.
///
/// Heuristics, checked per line:
/// - a pipe-delimited table-shaped line (`|a|b|`),
/// - a bold run (`**text**`),
/// - a list-item prefix (`- ` or `* ` at the start of a line).
pub fn looks_like_markdown(content: &str) -> bool {
    content.lines().any(|line| {
        has_table_shape(line) || has_bold_run(line) || has_list_prefix(line)
    })
}

fn has_table_shape(line: &str) -> bool {
    match (line.find('|'), line.rfind('|')) {
        (Some(first), Some(last)) => first != last,
        _ => false,
    }
}

fn has_bold_run(line: &str) -> bool {
    // "**" then at least one character then "**" again.
    line.find("**")
        .is_some_and(|i| line[i + 2..].find("**").is_some_and(|j| j > 0))
}

fn has_list_prefix(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("- ") || trimmed.starts_with("* ")
}

/// Normalizes plain-text content into display blocks.
///
/// Each line is trimmed; runs of two or more blank lines collapse into a
/// single break. Non-empty lines become `Text` blocks, remaining blank lines
/// become explicit `Break`s.
pub fn normalize_plain_lines(content: &str) -> Vec<LineBlock> {
    let mut blocks = Vec::new();
    let mut previous_blank = false;

    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !previous_blank {
                blocks.push(LineBlock::Break);
            }
            previous_blank = true;
        } else {
            blocks.push(LineBlock::Text(trimmed.to_string()));
            previous_blank = false;
        }
    }

    blocks
}
