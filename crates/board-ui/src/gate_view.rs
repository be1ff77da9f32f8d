//! Session gate screen.
//!
//! Prompts for the shared access code. The code is compared in plaintext by
//! the session; this screen only masks the echo. It is a convenience lock,
//! not an authentication boundary.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::components::header::SPARKLES;
use crate::themes::Theme;

/// Render the gate screen.
///
/// `typed` is the in-progress code entry (echoed masked); `flash` is an
/// optional error line shown after a wrong attempt.
pub fn render(frame: &mut Frame, area: Rect, typed: &str, flash: Option<&str>, theme: &Theme) {
    let masked: String = "•".repeat(typed.chars().count());

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(SPARKLES, theme.header_accent),
            Span::styled(" BRANDBOARD ", theme.header),
            Span::styled(SPARKLES, theme.header_accent),
        ]),
        Line::from(""),
        Line::from(Span::styled("Enter access code:", theme.label)),
        Line::from(vec![
            Span::styled(masked, theme.value),
            Span::styled("_", theme.dim),
        ]),
        Line::from(""),
    ];

    match flash {
        Some(message) => lines.push(Line::from(Span::styled(message.to_string(), theme.error))),
        None => lines.push(Line::from(Span::styled(
            "Upload or paste tabular data once unlocked.",
            theme.dim,
        ))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter to unlock | Esc to quit",
        theme.dim,
    )));

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" brandboard "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_render_gate_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, "sec", None, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_gate_with_flash_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, "", Some("Wrong access code"), &theme);
            })
            .unwrap();
    }
}
