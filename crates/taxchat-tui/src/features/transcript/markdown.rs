//! Markdown rendering into styled lines.
//!
//! Assistant responses that pass the markdown heuristics are parsed with
//! pulldown-cmark and converted to `StyledLine`s: paragraphs, headings,
//! bold/italic runs, inline code, fenced code blocks, lists, rules, and
//! pipe tables (rendered with padded columns).

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

use super::style::{Style, StyledLine, StyledSpan, wrap_styled_spans};

/// Renders markdown text into styled lines wrapped at `width`.
pub fn render_markdown(text: &str, width: usize) -> Vec<StyledLine> {
    if text.is_empty() {
        return vec![StyledLine::empty()];
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, options);

    let mut renderer = MarkdownRenderer::new(width.max(16));
    for event in parser {
        renderer.process_event(event);
    }
    renderer.finish()
}

/// Buffered pipe table; rendered with padded columns on table end.
#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
    in_header: bool,
}

impl TableBuffer {
    fn finish_cell(&mut self) {
        self.current_row.push(std::mem::take(&mut self.current_cell));
    }

    fn finish_row(&mut self) {
        let row = std::mem::take(&mut self.current_row);
        if self.in_header {
            self.header = row;
        } else {
            self.rows.push(row);
        }
    }

    /// Renders the table as `| a | b |` lines with padded columns.
    fn render(&self) -> Vec<StyledLine> {
        let column_count = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0);
        if column_count == 0 {
            return Vec::new();
        }

        let mut widths = vec![0usize; column_count];
        for row in std::iter::once(&self.header).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let mut lines = Vec::new();
        if !self.header.is_empty() {
            lines.push(table_line(&self.header, &widths, Style::Bold));
            let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(table_line(&dashes, &widths, Style::TableBorder));
        }
        for row in &self.rows {
            lines.push(table_line(row, &widths, Style::Assistant));
        }
        lines
    }
}

fn table_line(cells: &[String], widths: &[usize], cell_style: Style) -> StyledLine {
    let mut spans = vec![StyledSpan::new("|", Style::TableBorder)];
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map_or("", String::as_str);
        let padding = width.saturating_sub(cell.width());
        spans.push(StyledSpan::new(
            format!(" {cell}{} ", " ".repeat(padding)),
            cell_style,
        ));
        spans.push(StyledSpan::new("|", Style::TableBorder));
    }
    StyledLine { spans }
}

/// Internal state for markdown rendering.
struct MarkdownRenderer {
    width: usize,
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    /// Pending bullet/index prefix for the next flushed line.
    item_prefix: Option<String>,
    bold_depth: usize,
    emphasis_depth: usize,
    in_heading: bool,
    in_code_block: bool,
    /// Ordered-list counters; None entries are bullet lists.
    list_stack: Vec<Option<u64>>,
    table: Option<TableBuffer>,
}

impl MarkdownRenderer {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            current: Vec::new(),
            item_prefix: None,
            bold_depth: 0,
            emphasis_depth: 0,
            in_heading: false,
            in_code_block: false,
            list_stack: Vec::new(),
            table: None,
        }
    }

    fn current_style(&self) -> Style {
        if self.in_code_block {
            Style::Code
        } else if self.in_heading {
            Style::Heading
        } else if self.bold_depth > 0 {
            Style::Bold
        } else if self.emphasis_depth > 0 {
            Style::Emphasis
        } else {
            Style::Assistant
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        // Table cells collect plain text only.
        if let Some(table) = self.table.as_mut() {
            match event {
                Event::Text(t) | Event::Code(t) => {
                    table.current_cell.push_str(&t);
                    return;
                }
                Event::End(TagEnd::TableCell) => {
                    table.finish_cell();
                    return;
                }
                Event::End(TagEnd::TableRow) | Event::End(TagEnd::TableHead) => {
                    let was_header = table.in_header;
                    table.finish_row();
                    if was_header {
                        table.in_header = false;
                    }
                    return;
                }
                Event::End(TagEnd::Table) => {
                    let table = self.table.take().unwrap_or_default();
                    self.blank_separator();
                    self.lines.extend(table.render());
                    return;
                }
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    // Code blocks keep their own line structure.
                    for line in text.lines() {
                        self.lines
                            .push(StyledLine::single(format!("  {line}"), Style::Code));
                    }
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                self.current.push(StyledSpan::new(code.to_string(), Style::Code));
            }
            Event::SoftBreak | Event::HardBreak => self.flush_current(),
            Event::Rule => {
                self.blank_separator();
                self.lines.push(StyledLine::single(
                    "─".repeat(self.width.min(40)),
                    Style::TableBorder,
                ));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.blank_separator(),
            Tag::Heading { .. } => {
                self.blank_separator();
                self.in_heading = true;
            }
            Tag::Strong => self.bold_depth += 1,
            Tag::Emphasis => self.emphasis_depth += 1,
            Tag::CodeBlock(_) => {
                self.blank_separator();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.blank_separator();
                }
                self.list_stack.push(start);
            }
            Tag::Item => {
                let depth = self.list_stack.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                let prefix = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let p = format!("{indent}{n}. ");
                        *n += 1;
                        p
                    }
                    _ => format!("{indent}- "),
                };
                self.item_prefix = Some(prefix);
            }
            Tag::Table(_) => {
                self.table = Some(TableBuffer {
                    in_header: true,
                    ..TableBuffer::default()
                });
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush_current(),
            TagEnd::Heading(_) => {
                self.flush_current();
                self.in_heading = false;
            }
            TagEnd::Strong => self.bold_depth = self.bold_depth.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis_depth = self.emphasis_depth.saturating_sub(1),
            TagEnd::CodeBlock => self.in_code_block = false,
            TagEnd::List(_) => {
                self.list_stack.pop();
            }
            TagEnd::Item => self.flush_current(),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        self.current
            .push(StyledSpan::new(text.to_string(), self.current_style()));
    }

    /// Wraps and emits the spans collected for the current logical line.
    fn flush_current(&mut self) {
        if self.current.is_empty() && self.item_prefix.is_none() {
            return;
        }
        let spans = std::mem::take(&mut self.current);

        if let Some(prefix) = self.item_prefix.take() {
            let indent = " ".repeat(prefix.width());
            let content_width = self.width.saturating_sub(prefix.width()).max(8);
            for (i, line) in wrap_styled_spans(&spans, content_width).into_iter().enumerate() {
                let lead = if i == 0 {
                    StyledSpan::new(prefix.clone(), Style::Bullet)
                } else {
                    StyledSpan::new(indent.clone(), Style::Plain)
                };
                let mut all = vec![lead];
                all.extend(line.spans);
                self.lines.push(StyledLine { spans: all });
            }
        } else {
            self.lines.extend(wrap_styled_spans(&spans, self.width));
        }
    }

    /// Blank line between blocks (none at the very top).
    fn blank_separator(&mut self) {
        self.flush_current();
        if !self.lines.is_empty() {
            self.lines.push(StyledLine::empty());
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        self.flush_current();
        if let Some(table) = self.table.take() {
            self.lines.extend(table.render());
        }
        if self.lines.is_empty() {
            self.lines.push(StyledLine::empty());
        }
        self.lines
    }
}
