//! Top-level frame layout.
//!
//! ```text
//! ┌ transcript (fills) ┐
//! ├ starters (optional)┤
//! ├ input (bordered)   ┤
//! └ status line        ┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{AppState, SendState};
use crate::{starters, transcript};

/// Renders one frame.
pub fn render(state: &mut AppState, frame: &mut Frame) {
    let input_rows = (state.input.lines().len() as u16).clamp(1, 4) + 2;
    let starters_rows = if state.starters.is_visible() {
        state.starters.height().min(frame.area().height / 2)
    } else {
        0
    };

    let [transcript_area, starters_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(starters_rows),
        Constraint::Length(input_rows),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    transcript::render(
        &mut state.transcript,
        frame,
        transcript_area,
        state.spinner_frame,
    );

    if state.starters.is_visible() {
        starters::render(&state.starters, frame, starters_area);
    }

    render_input(state, frame, input_area);
    render_status(state, frame, status_area);
}

fn render_input(state: &AppState, frame: &mut Frame, area: ratatui::layout::Rect) {
    let title = match state.send_state {
        SendState::Idle => " Message ",
        SendState::AwaitingResponse => " Message (awaiting response) ",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let lines: Vec<Line<'_>> = state.input.lines().into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Place the terminal cursor at the edit position.
    let (row, col) = state.input.cursor_position();
    let x = inner.x + (col as u16).min(inner.width.saturating_sub(1));
    let y = inner.y + (row as u16).min(inner.height.saturating_sub(1));
    frame.set_cursor_position(Position::new(x, y));
}

fn render_status(state: &AppState, frame: &mut Frame, area: ratatui::layout::Rect) {
    let role = state
        .session
        .role
        .map_or_else(String::new, |r| format!(" · {r}"));
    let status = format!(
        " {}{role} · Enter send · Ctrl+J newline · Ctrl+R reset · PgUp/PgDn scroll · Ctrl+C quit",
        state.session.id
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
