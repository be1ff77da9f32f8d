//! Data-entry screen: pick a data file or paste CSV text.
//!
//! Load failures are reported inline here; a previously loaded dataset stays
//! installed and the user simply retries with corrected input.

use std::path::PathBuf;

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::themes::Theme;

/// Which input mode the data-entry screen is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Choose a CSV/XLSX file discovered under the data directory.
    Files,
    /// Paste CSV text (header row first).
    Paste,
}

/// Everything the data-entry screen needs to render.
pub struct EntryViewData<'a> {
    pub mode: InputMode,
    /// Discovered data files, sorted.
    pub files: &'a [PathBuf],
    /// Index of the highlighted file.
    pub selected: usize,
    /// The in-progress paste buffer.
    pub paste_buffer: &'a str,
    /// Inline error from the last failed load attempt.
    pub flash: Option<&'a str>,
    /// Whether a dataset is already installed (enables Esc-to-dashboard).
    pub has_dataset: bool,
}

/// Render the data-entry screen.
pub fn render(frame: &mut Frame, area: Rect, data: &EntryViewData, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    // Mode tabs.
    let (files_style, paste_style) = match data.mode {
        InputMode::Files => (theme.highlight, theme.dim),
        InputMode::Paste => (theme.dim, theme.highlight),
    };
    lines.push(Line::from(vec![
        Span::styled("[ Load file ]", files_style),
        Span::raw("  "),
        Span::styled("[ Paste CSV ]", paste_style),
        Span::styled("   Tab switches mode", theme.dim),
    ]));
    lines.push(Line::from(""));

    match data.mode {
        InputMode::Files => render_file_list(&mut lines, data, theme),
        InputMode::Paste => render_paste_buffer(&mut lines, data, theme),
    }

    lines.push(Line::from(""));
    if let Some(message) = data.flash {
        lines.push(Line::from(Span::styled(message.to_string(), theme.error)));
        if data.has_dataset {
            lines.push(Line::from(Span::styled(
                "Previously loaded data is untouched.",
                theme.dim,
            )));
        }
    }

    lines.push(Line::from(""));
    let hint = match (data.mode, data.has_dataset) {
        (InputMode::Files, true) => "Up/Down select | Enter load | Esc back to dashboard | q quit",
        (InputMode::Files, false) => "Up/Down select | Enter load | q quit",
        (InputMode::Paste, true) => "Type or paste, Enter for newline | Ctrl+D load | Esc back",
        (InputMode::Paste, false) => "Type or paste, Enter for newline | Ctrl+D load",
    };
    lines.push(Line::from(Span::styled(hint, theme.dim)));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Load data "),
        ),
        area,
    );
}

fn render_file_list(lines: &mut Vec<Line>, data: &EntryViewData, theme: &Theme) {
    if data.files.is_empty() {
        lines.push(Line::from(Span::styled(
            "No CSV/XLSX files found in the data directory.",
            theme.warning,
        )));
        lines.push(Line::from(Span::styled(
            "Point --data-dir at your data, or switch to paste mode.",
            theme.dim,
        )));
        return;
    }

    for (idx, path) in data.files.iter().enumerate() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("(unreadable name)");
        let name = clip(name, 60);
        if idx == data.selected {
            lines.push(Line::from(vec![
                Span::styled("> ", theme.highlight),
                Span::styled(name, theme.highlight),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(name, theme.text),
            ]));
        }
    }
}

fn render_paste_buffer(lines: &mut Vec<Line>, data: &EntryViewData, theme: &Theme) {
    if data.paste_buffer.is_empty() {
        lines.push(Line::from(Span::styled(
            "Paste your CSV data here (include headers).",
            theme.dim,
        )));
        return;
    }
    for text_line in data.paste_buffer.lines() {
        lines.push(Line::from(Span::styled(
            clip(text_line, 100),
            theme.text,
        )));
    }
}

/// Clip a string to at most `max` display columns, appending an ellipsis.
fn clip(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0usize;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
