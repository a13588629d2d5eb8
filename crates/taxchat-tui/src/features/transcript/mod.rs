//! Transcript feature: cells, scroll state, rendering.
//!
//! The transcript is the source of truth for what the conversation looks
//! like. It is width-agnostic; wrapping happens at display time for the
//! current terminal width.

mod cell;
pub mod markdown;
mod render;
mod style;

pub use cell::{CellId, TranscriptCell};
pub use render::render;
pub use style::{Style, StyledLine, StyledSpan};
use taxchat_core::message::ChatMessage;

/// Scroll mode for the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Auto-scroll to show latest content (bottom of transcript).
    FollowLatest,
    /// User scrolled manually; offset is line index from top.
    Anchored { offset: usize },
}

/// Scroll state for the transcript pane.
///
/// Keeps the scroll math in one place. The cached line count is refreshed
/// during render, when the wrapped height for the current width is known.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub mode: ScrollMode,
    /// Total wrapped line count from the last render.
    pub cached_line_count: usize,
    /// Viewport height from the last render.
    pub viewport_height: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            mode: ScrollMode::FollowLatest,
            cached_line_count: 0,
            viewport_height: 20,
        }
    }
}

impl ScrollState {
    /// Returns true if currently following output (auto-scroll).
    pub fn is_following(&self) -> bool {
        matches!(self.mode, ScrollMode::FollowLatest)
    }

    /// Returns the scroll offset for rendering.
    pub fn offset(&self) -> usize {
        let max_offset = self
            .cached_line_count
            .saturating_sub(self.viewport_height);
        match self.mode {
            ScrollMode::FollowLatest => max_offset,
            ScrollMode::Anchored { offset } => offset.min(max_offset),
        }
    }

    /// Scrolls up by one page.
    pub fn page_up(&mut self) {
        let lines = self.viewport_height.max(1);
        self.mode = ScrollMode::Anchored {
            offset: self.offset().saturating_sub(lines),
        };
    }

    /// Scrolls down by one page; reattaches to the bottom when reached.
    pub fn page_down(&mut self) {
        if self.is_following() {
            return;
        }
        let lines = self.viewport_height.max(1);
        let max_offset = self
            .cached_line_count
            .saturating_sub(self.viewport_height);
        let new_offset = (self.offset() + lines).min(max_offset);
        if new_offset >= max_offset {
            self.mode = ScrollMode::FollowLatest;
        } else {
            self.mode = ScrollMode::Anchored { offset: new_offset };
        }
    }

    /// Scrolls to the bottom and follows new content.
    pub fn scroll_to_bottom(&mut self) {
        self.mode = ScrollMode::FollowLatest;
    }

    /// Resets after the transcript is cleared.
    pub fn reset(&mut self) {
        self.mode = ScrollMode::FollowLatest;
        self.cached_line_count = 0;
    }
}

/// Ordered list of rendered messages plus scroll state.
#[derive(Debug, Default)]
pub struct TranscriptState {
    cells: Vec<TranscriptCell>,
    pub scroll: ScrollState,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            scroll: ScrollState::default(),
        }
    }

    /// Appends a message and snaps the view to the bottom.
    pub fn push(&mut self, message: ChatMessage) {
        self.cells.push(TranscriptCell::new(message));
        self.scroll.scroll_to_bottom();
    }

    /// Removes the transient typing indicator; idempotent when absent.
    pub fn remove_typing(&mut self) {
        self.cells.retain(|cell| !cell.is_typing());
    }

    /// Clears all rendered messages (session reset).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.scroll.reset();
    }

    pub fn cells(&self) -> &[TranscriptCell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn page_up(&mut self) {
        self.scroll.page_up();
    }

    pub fn page_down(&mut self) {
        self.scroll.page_down();
    }
}
