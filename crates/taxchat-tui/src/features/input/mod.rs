//! Input feature: the message being typed.
//!
//! A small grapheme-aware edit buffer. Enter submits; Ctrl+J inserts a
//! newline; the usual Ctrl+A/E/U/K line-editing keys apply.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Edit buffer with a byte-offset cursor kept on grapheme boundaries.
#[derive(Debug, Default)]
pub struct InputState {
    text: String,
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the buffer is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Takes the buffer contents, leaving it empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Replaces the buffer contents, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.cursor, |g| self.cursor + g.len())
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let start = self.prev_boundary();
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let end = self.next_boundary();
            self.text.replace_range(self.cursor..end, "");
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    /// Moves to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.text[..self.cursor]
            .rfind('\n')
            .map_or(0, |i| i + 1);
    }

    /// Moves to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
    }

    /// Kills from the start of the line to the cursor.
    pub fn kill_to_start(&mut self) {
        let start = self.text[..self.cursor]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Kills from the cursor to the end of the line.
    pub fn kill_to_end(&mut self) {
        let end = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
        self.text.replace_range(self.cursor..end, "");
    }

    /// Lines of the buffer for rendering.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Cursor position as (row, display column) for the terminal cursor.
    pub fn cursor_position(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor];
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().unwrap_or("").width();
        (row, col)
    }

    /// Handles pure editing keys. Returns true when the key was consumed.
    ///
    /// Submission (Enter) and app-level keys are the reducer's business.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('a') if ctrl => self.move_home(),
            KeyCode::Char('e') if ctrl => self.move_end(),
            KeyCode::Char('u') if ctrl => self.kill_to_start(),
            KeyCode::Char('k') if ctrl => self.kill_to_end(),
            KeyCode::Char('j') if ctrl => self.insert_newline(),
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut InputState, s: &str) {
        for c in s.chars() {
            input.insert_char(c);
        }
    }

    #[test]
    fn test_insert_and_take() {
        let mut input = InputState::new();
        type_str(&mut input, "hello");
        assert_eq!(input.take(), "hello");
        assert!(input.is_blank());
    }

    #[test]
    fn test_backspace_removes_grapheme() {
        let mut input = InputState::new();
        type_str(&mut input, "héllo");
        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "hél");
    }

    #[test]
    fn test_cursor_movement_and_mid_insert() {
        let mut input = InputState::new();
        type_str(&mut input, "ac");
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn test_kill_to_start_respects_line() {
        let mut input = InputState::new();
        type_str(&mut input, "one");
        input.insert_newline();
        type_str(&mut input, "two");
        input.kill_to_start();
        assert_eq!(input.text(), "one\n");
    }

    #[test]
    fn test_cursor_position_tracks_rows() {
        let mut input = InputState::new();
        type_str(&mut input, "ab");
        input.insert_newline();
        type_str(&mut input, "c");
        assert_eq!(input.cursor_position(), (1, 1));
    }

    #[test]
    fn test_blank_detects_whitespace_only() {
        let mut input = InputState::new();
        type_str(&mut input, "   ");
        assert!(input.is_blank());
    }
}
