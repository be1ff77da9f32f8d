//! The synchronous dashboard pipeline.
//!
//! One pass per interaction: classify columns, guard that a metric exists,
//! aggregate, rank, and (when a date column is selected) extract the monthly
//! trend. The result is an immutable snapshot the UI renders from; identical
//! inputs always produce an identical snapshot.

use board_core::error::{BoardError, Result};
use board_core::models::{Dataset, RankedGroup, SummaryStats, TrendPoint};
use board_data::aggregator::{self, SHARE_GROUP_LIMIT, TOP_GROUP_LIMIT};
use board_data::{schema, trend};

use crate::session::Session;

/// One fully computed dashboard: everything the presentation layer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// The metric column the snapshot was computed for.
    pub metric: String,
    /// The group column the snapshot was computed for.
    pub group: String,
    /// The four scalar stats.
    pub stats: SummaryStats,
    /// Top groups by summed metric, descending, at most [`TOP_GROUP_LIMIT`].
    pub top_groups: Vec<RankedGroup>,
    /// Top groups for the share breakdown, at most [`SHARE_GROUP_LIMIT`],
    /// exposed as raw sums (the renderer computes percentages).
    pub share_groups: Vec<RankedGroup>,
    /// Monthly trend points; empty means "trend unavailable".
    pub trend: Vec<TrendPoint>,
}

/// Build a dashboard snapshot for one dataset and one set of selections.
///
/// `metric` must name a numeric column; `group` may be any column. The trend
/// step is advisory: whatever happens there, the summary and rankings are
/// returned.
pub fn build_dashboard(
    dataset: &Dataset,
    metric: &str,
    group: &str,
    date_col: Option<&str>,
) -> Result<Dashboard> {
    let descriptors = schema::inspect(dataset);
    schema::ensure_numeric_available(&descriptors)?;

    let is_numeric = descriptors
        .iter()
        .any(|d| d.name == metric && d.is_numeric());
    if !is_numeric {
        if dataset.column_index(metric).is_none() {
            return Err(BoardError::UnknownColumn(metric.to_string()));
        }
        return Err(BoardError::NotNumeric(metric.to_string()));
    }

    let stats = aggregator::summarize(dataset, metric, group)?;
    let top_groups = aggregator::top_groups(dataset, metric, group, TOP_GROUP_LIMIT)?;
    let share_groups = aggregator::top_groups(dataset, metric, group, SHARE_GROUP_LIMIT)?;
    let trend = date_col
        .map(|col| trend::monthly_trend(dataset, metric, col))
        .unwrap_or_default();

    Ok(Dashboard {
        metric: metric.to_string(),
        group: group.to_string(),
        stats,
        top_groups,
        share_groups,
        trend,
    })
}

/// Rebuild the dashboard from the session's current dataset and selections.
///
/// Returns `Ok(None)` when no dataset is installed or selections are missing.
pub fn rebuild(session: &Session) -> Result<Option<Dashboard>> {
    let (Some(dataset), Some(metric), Some(group)) =
        (session.dataset(), session.metric(), session.group())
    else {
        return Ok(None);
    };
    build_dashboard(dataset, metric, group, session.date_col()).map(Some)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::models::Value;

    fn sales_dataset() -> Dataset {
        Dataset::new(
            "sales.csv",
            vec![
                "Brand".to_string(),
                "Sales".to_string(),
                "Date".to_string(),
            ],
            vec![
                vec![
                    Value::Text("A".to_string()),
                    Value::Number(100.0),
                    Value::Text("2024-01-05".to_string()),
                ],
                vec![
                    Value::Text("B".to_string()),
                    Value::Number(300.0),
                    Value::Text("2024-02-01".to_string()),
                ],
                vec![
                    Value::Text("A".to_string()),
                    Value::Number(50.0),
                    Value::Text("2024-01-20".to_string()),
                ],
            ],
        )
    }

    #[test]
    fn test_build_dashboard_end_to_end() {
        let ds = sales_dataset();
        let dash = build_dashboard(&ds, "Sales", "Brand", None).unwrap();

        assert_eq!(dash.stats.record_count, 3);
        assert!((dash.stats.metric_sum - 450.0).abs() < 1e-9);
        assert_eq!(dash.stats.distinct_groups, 2);
        assert!((dash.stats.metric_mean - 150.0).abs() < 1e-9);

        assert_eq!(dash.top_groups.len(), 2);
        assert_eq!(dash.top_groups[0].group, "B");
        assert_eq!(dash.share_groups.len(), 2);
        assert!(dash.trend.is_empty(), "no date column selected");
    }

    #[test]
    fn test_build_dashboard_with_trend() {
        let ds = sales_dataset();
        let dash = build_dashboard(&ds, "Sales", "Brand", Some("Date")).unwrap();

        assert_eq!(dash.trend.len(), 2);
        assert_eq!(dash.trend[0].month, "2024-01");
        assert!((dash.trend[0].total - 150.0).abs() < 1e-9);
        assert_eq!(dash.trend[1].month, "2024-02");
    }

    #[test]
    fn test_build_dashboard_trend_degrades_silently() {
        // A non-date column as the date selection must not fail the build.
        let ds = sales_dataset();
        let dash = build_dashboard(&ds, "Sales", "Brand", Some("Brand")).unwrap();
        assert!(dash.trend.is_empty());
        assert_eq!(dash.top_groups.len(), 2, "summary flow unaffected");
    }

    #[test]
    fn test_build_dashboard_idempotent() {
        let ds = sales_dataset();
        let first = build_dashboard(&ds, "Sales", "Brand", Some("Date")).unwrap();
        let second = build_dashboard(&ds, "Sales", "Brand", Some("Date")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_dashboard_no_numeric_columns() {
        let ds = Dataset::new(
            "names.csv",
            vec!["Brand".to_string()],
            vec![vec![Value::Text("A".to_string())]],
        );
        let err = build_dashboard(&ds, "Brand", "Brand", None).unwrap_err();
        assert_eq!(err.to_string(), "No numeric columns found for analysis");
    }

    #[test]
    fn test_build_dashboard_non_numeric_metric() {
        let ds = sales_dataset();
        let err = build_dashboard(&ds, "Brand", "Brand", None).unwrap_err();
        assert_eq!(err.to_string(), "Column is not numeric: Brand");
    }

    #[test]
    fn test_build_dashboard_unknown_metric() {
        let ds = sales_dataset();
        let err = build_dashboard(&ds, "Revenue", "Brand", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown column: Revenue");
    }

    // ── rebuild ───────────────────────────────────────────────────────────────

    #[test]
    fn test_rebuild_without_dataset_is_none() {
        let session = Session::new("sesame");
        assert!(rebuild(&session).unwrap().is_none());
    }

    #[test]
    fn test_rebuild_uses_session_selections() {
        let mut session = Session::new("sesame");
        session.install(sales_dataset()).unwrap();

        let dash = rebuild(&session).unwrap().unwrap();
        assert_eq!(dash.metric, "Sales");
        assert_eq!(dash.group, "Brand");
        assert!(dash.trend.is_empty());
    }
}
