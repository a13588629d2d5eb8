//! Starter suggestions panel.
//!
//! Pre-written prompts shown before the first message. Up/Down moves the
//! highlight, Tab copies the highlighted starter into the input box, Enter on
//! an empty input sends it directly. The panel hides on the first send and
//! reappears after a reset.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Starter panel state.
#[derive(Debug, Clone)]
pub struct StartersState {
    visible: bool,
    items: Vec<String>,
    /// Highlight; None until the user navigates, so a bare Enter on an empty
    /// input stays a no-op.
    selected: Option<usize>,
}

impl StartersState {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            visible: !items.is_empty(),
            items,
            selected: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Currently highlighted starter, if any.
    pub fn current(&self) -> Option<&str> {
        self.selected.and_then(|i| self.items.get(i)).map(String::as_str)
    }

    /// Index of the highlighted starter, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.items.len(),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Hides the panel (first send).
    pub fn hide(&mut self) {
        self.visible = false;
        self.selected = None;
    }

    /// Shows the panel again (session reset).
    pub fn show(&mut self) {
        self.visible = !self.items.is_empty();
        self.selected = None;
    }

    /// Rows needed to render the panel, including the border.
    pub fn height(&self) -> u16 {
        (self.items.len() as u16).saturating_add(2)
    }
}

/// Renders the starter panel into `area`.
pub fn render(starters: &StartersState, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line<'_>> = starters
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if starters.selected_index() == Some(i) {
                Line::from(Span::styled(
                    format!("▸ {item}"),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {item}"),
                    Style::default().fg(Color::Gray),
                ))
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Try asking ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
