//! Transcript pane rendering.
//!
//! Builds wrapped styled lines for every cell, updates the scroll state's
//! cached line count, and draws the visible window.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style as TuiStyle};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::style::{Style, StyledLine};
use super::TranscriptState;

/// Renders the transcript into `area`.
pub fn render(
    transcript: &mut TranscriptState,
    frame: &mut Frame,
    area: Rect,
    spinner_frame: usize,
) {
    let width = area.width.saturating_sub(1) as usize;

    let mut lines: Vec<StyledLine> = Vec::new();
    for cell in transcript.cells() {
        lines.extend(cell.display_lines(width.max(8), spinner_frame));
        lines.push(StyledLine::empty());
    }

    transcript.scroll.viewport_height = area.height as usize;
    transcript.scroll.cached_line_count = lines.len();
    let offset = transcript.scroll.offset();

    let visible: Vec<Line<'_>> = lines
        .iter()
        .skip(offset)
        .take(area.height as usize)
        .map(to_tui_line)
        .collect();

    frame.render_widget(Paragraph::new(visible), area);
}

fn to_tui_line(line: &StyledLine) -> Line<'_> {
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.as_str(), tui_style(span.style)))
            .collect::<Vec<_>>(),
    )
}

/// Translates semantic styles to terminal styles.
fn tui_style(style: Style) -> TuiStyle {
    match style {
        Style::Plain => TuiStyle::default(),
        Style::UserPrefix => TuiStyle::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Style::User => TuiStyle::default().fg(Color::Cyan),
        Style::Assistant => TuiStyle::default(),
        Style::Bold => TuiStyle::default().add_modifier(Modifier::BOLD),
        Style::Emphasis => TuiStyle::default().add_modifier(Modifier::ITALIC),
        Style::Code => TuiStyle::default().fg(Color::Yellow),
        Style::Heading => TuiStyle::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED),
        Style::Bullet => TuiStyle::default().fg(Color::Green),
        Style::TableBorder => TuiStyle::default().fg(Color::DarkGray),
        Style::Typing => TuiStyle::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        Style::Timestamp => TuiStyle::default().fg(Color::DarkGray),
    }
}
