use crate::themes::Theme;
use board_core::formatting::{format_number, percentage};
use board_core::models::RankedGroup;
use ratatui::text::{Line, Span};

/// A proportional multi-coloured bar plus legend that visualises the top-5
/// groups' share of their combined metric sum.
///
/// Each group is rendered as a contiguous coloured segment whose width is
/// proportional to its share, followed by one legend line per group showing
/// the percentage and the raw sum. Percentages are computed here from the raw
/// sums; the aggregation result is never pre-normalised.
pub struct ShareBar<'a> {
    /// Ranked groups, largest first, at most five.
    pub groups: &'a [RankedGroup],
    /// Theme from which segment colour styles are taken.
    pub theme: &'a Theme,
    /// Total width of the bar in terminal columns.
    pub width: u16,
}

impl<'a> ShareBar<'a> {
    /// Construct a new share bar with the default width.
    pub fn new(groups: &'a [RankedGroup], theme: &'a Theme) -> Self {
        Self {
            groups,
            theme,
            width: 40,
        }
    }

    /// Render the segmented bar and legend as lines.
    ///
    /// Produces one bar line followed by one legend line per group; an empty
    /// group list produces a single dim placeholder line.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let whole: f64 = self.groups.iter().map(|g| g.total.max(0.0)).sum();
        if self.groups.is_empty() || whole <= 0.0 {
            return vec![Line::from(Span::styled("no share data", self.theme.dim))];
        }

        let mut lines = Vec::with_capacity(self.groups.len() + 1);

        // Coloured segments proportional to each group's share.
        let mut segments: Vec<Span<'a>> = Vec::new();
        for (rank, group) in self.groups.iter().enumerate() {
            let pct = percentage(group.total.max(0.0), whole, 1);
            let chars = ((pct / 100.0) * self.width as f64).round() as usize;
            if chars > 0 {
                segments.push(Span::styled(
                    "█".repeat(chars),
                    self.theme.share_style(rank),
                ));
            }
        }
        lines.push(Line::from(segments));

        // One legend line per group.
        for (rank, group) in self.groups.iter().enumerate() {
            let pct = percentage(group.total.max(0.0), whole, 1);
            lines.push(Line::from(vec![
                Span::styled("■ ", self.theme.share_style(rank)),
                Span::styled(group.group.clone(), self.theme.text),
                Span::styled(
                    format!("  {:.1}% ({})", pct, format_number(group.total, 0)),
                    self.theme.label,
                ),
            ]));
        }

        lines
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
