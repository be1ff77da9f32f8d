//! The main dashboard screen.
//!
//! Renders the four stat tiles, the top-10 bar chart, the top-5 share
//! breakdown, the optional monthly trend line, and a table of either the
//! top-10 rows or a raw-data preview.

use board_core::formatting::format_number;
use board_core::models::Dataset;
use board_runtime::pipeline::Dashboard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, GraphType, Paragraph, Row,
        Table,
    },
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::components::header::Header;
use crate::components::share_bar::ShareBar;
use crate::themes::Theme;

/// Number of rows shown in the raw-data preview.
const RAW_PREVIEW_ROWS: usize = 8;

/// Everything the dashboard screen needs to render.
pub struct DashboardViewData<'a> {
    pub dashboard: &'a Dashboard,
    pub dataset: &'a Dataset,
    /// The currently selected date column, if any (for trend panel hints).
    pub date_col: Option<&'a str>,
    /// When set, the bottom table shows raw rows instead of the top 10.
    pub show_raw: bool,
}

/// Render the dashboard into `area`.
pub fn render(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // header
            Constraint::Length(3),  // stat tiles
            Constraint::Min(12),    // charts
            Constraint::Length(9),  // table / raw preview
            Constraint::Length(1),  // footer
        ])
        .split(area);

    render_header(frame, chunks[0], data, theme);
    render_stats(frame, chunks[1], data, theme);
    render_charts(frame, chunks[2], data, theme);
    if data.show_raw {
        render_raw_preview(frame, chunks[3], data, theme);
    } else {
        render_top_table(frame, chunks[3], data, theme);
    }
    render_footer(frame, chunks[4], theme);
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let header = Header::new(
        &data.dataset.source,
        data.dataset.row_count(),
        data.dataset.column_count(),
        theme,
    );
    frame.render_widget(Paragraph::new(Text::from(header.to_lines())), area);
}

fn render_stats(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &data.dashboard.stats;
    let metric = &data.dashboard.metric;

    stat_tile(
        frame,
        tiles[0],
        " Records ".to_string(),
        format_number(stats.record_count as f64, 0),
        theme,
    );
    stat_tile(
        frame,
        tiles[1],
        format!(" Total {} ", clip_label(metric, 12)),
        format_number(stats.metric_sum, 0),
        theme,
    );
    stat_tile(
        frame,
        tiles[2],
        " Groups ".to_string(),
        format_number(stats.distinct_groups as f64, 0),
        theme,
    );
    stat_tile(
        frame,
        tiles[3],
        format!(" Avg {} ", clip_label(metric, 12)),
        format_number(stats.metric_mean, 2),
        theme,
    );
}

fn stat_tile(frame: &mut Frame, area: Rect, title: String, value: String, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(value, theme.value)))
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn render_charts(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_bar_chart(frame, columns[0], data, theme);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_share_panel(frame, right[0], data, theme);
    render_trend_chart(frame, right[1], data, theme);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let dashboard = data.dashboard;
    let title = format!(
        " Top {} {} by {} ",
        dashboard.top_groups.len(),
        dashboard.group,
        dashboard.metric
    );

    let bars: Vec<Bar> = dashboard
        .top_groups
        .iter()
        .map(|g| {
            Bar::default()
                .label(Line::from(clip_label(&g.group, 10)))
                // BarChart heights are unsigned; negative sums clamp to zero
                // while the text label keeps the real value.
                .value(g.total.max(0.0).round() as u64)
                .text_value(format_number(g.total, 0))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1)
        .bar_style(theme.chart_bar)
        .value_style(theme.chart_value);

    frame.render_widget(chart, area);
}

fn render_share_panel(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let share = ShareBar::new(&data.dashboard.share_groups, theme);
    frame.render_widget(
        Paragraph::new(Text::from(share.to_lines())).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Top 5 {} Share ", clip_label(&data.dashboard.group, 14))),
        ),
        area,
    );
}

fn render_trend_chart(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let trend = &data.dashboard.trend;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Monthly Trend ");

    if trend.is_empty() {
        let message = match data.date_col {
            Some(col) => format!("No parseable dates in '{}'", col),
            None => "Press 'd' to pick a date column".to_string(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, theme.dim))).block(block),
            area,
        );
        return;
    }

    let points: Vec<(f64, f64)> = trend
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.total))
        .collect();

    let max_total = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let y_max = if max_total > 0.0 { max_total * 1.1 } else { 1.0 };
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let x_labels = vec![
        Span::styled(trend[0].month.clone(), theme.chart_axis),
        Span::styled(trend[trend.len() - 1].month.clone(), theme.chart_axis),
    ];
    let y_labels = vec![
        Span::styled("0".to_string(), theme.chart_axis),
        Span::styled(format_number(max_total / 2.0, 0), theme.chart_axis),
        Span::styled(format_number(max_total, 0), theme.chart_axis),
    ];

    let datasets = vec![ratatui::widgets::Dataset::default()
        .name(data.dashboard.metric.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .labels(x_labels)
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .labels(y_labels)
                .bounds([0.0, y_max]),
        );

    frame.render_widget(chart, area);
}

fn render_top_table(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let dashboard = data.dashboard;

    let header = Row::new(vec![
        Cell::from(dashboard.group.clone()).style(theme.table_header),
        Cell::from(dashboard.metric.clone()).style(theme.table_header),
    ])
    .height(1);

    let mut rows: Vec<Row> = dashboard
        .top_groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(g.group.clone()),
                Cell::from(format_number(g.total, 0)),
            ])
            .style(style)
        })
        .collect();

    // Totals row across the listed groups.
    let listed_total: f64 = dashboard.top_groups.iter().map(|g| g.total).sum();
    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format_number(listed_total, 0)),
        ])
        .style(theme.table_total),
    );

    let widths = [Constraint::Min(20), Constraint::Length(16)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Top {} table ", dashboard.top_groups.len())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

fn render_raw_preview(frame: &mut Frame, area: Rect, data: &DashboardViewData, theme: &Theme) {
    let dataset = data.dataset;

    let header = Row::new(
        dataset
            .columns
            .iter()
            .map(|c| Cell::from(clip_label(c, 14)).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = dataset
        .rows
        .iter()
        .take(RAW_PREVIEW_ROWS)
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(row.iter().map(|v| Cell::from(clip_label(&v.display(), 14)))).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = dataset
        .columns
        .iter()
        .map(|_| Constraint::Length(16))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Raw data (first {} of {} rows) ",
            RAW_PREVIEW_ROWS.min(dataset.row_count()),
            dataset.row_count()
        )))
        .style(theme.text);

    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "m metric | g group | d date | r raw | n new data | l lock | q quit",
            theme.dim,
        ))),
        area,
    );
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Clip a label to at most `max` display columns, appending an ellipsis.
fn clip_label(s: &str, max: usize) -> String {
    let mut width = 0usize;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max {
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
