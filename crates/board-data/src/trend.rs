//! Monthly trend extraction over a user-designated date column.
//!
//! Coerces the chosen column to calendar dates with a permissive parser,
//! buckets rows by `"YYYY-MM"` label, and sums the metric per bucket. The
//! whole path is advisory: unparseable rows are skipped and a column that
//! yields no dates produces an empty result, never an error.

use std::collections::BTreeMap;

use board_core::models::{Dataset, TrendPoint, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Compute the month-bucketed metric trend for `date_col`.
///
/// Returns one point per calendar month present in the data, ascending by
/// month label (lexicographic `"YYYY-MM"` order is chronological). Rows whose
/// date cell cannot be coerced are skipped; a missing metric contributes
/// zero. An empty result means "trend unavailable".
pub fn monthly_trend(dataset: &Dataset, metric: &str, date_col: &str) -> Vec<TrendPoint> {
    let Some(metric_idx) = dataset.column_index(metric) else {
        return Vec::new();
    };
    let Some(date_idx) = dataset.column_index(date_col) else {
        return Vec::new();
    };

    let mut buckets: BTreeMap<String, f64> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in &dataset.rows {
        let Some(date) = coerce_date(&row[date_idx]) else {
            skipped += 1;
            continue;
        };
        let slot = buckets.entry(date.format("%Y-%m").to_string()).or_insert(0.0);
        if let Some(v) = row[metric_idx].as_number() {
            *slot += v;
        }
    }

    if skipped > 0 {
        debug!(
            "Trend over '{}': skipped {} of {} rows without a parseable date",
            date_col,
            skipped,
            dataset.row_count()
        );
    }

    buckets
        .into_iter()
        .map(|(month, total)| TrendPoint { month, total })
        .collect()
}

/// Coerce one cell to a calendar date, if possible.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => parse_date_str(s),
        Value::Number(_) | Value::Null => None,
    }
}

/// Parse a date from the variety of string formats found in user data.
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.date_naive());
    }

    // Try a series of common strftime-like patterns.
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d/%m/%Y",
        "%m/%d/%Y",
    ];

    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
        // date-only patterns use NaiveDate.
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, sales: Value) -> Vec<Value> {
        let cell = if date.is_empty() {
            Value::Null
        } else {
            Value::Text(date.to_string())
        };
        vec![cell, sales]
    }

    fn dataset(rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::new(
            "test",
            vec!["Date".to_string(), "Sales".to_string()],
            rows,
        )
    }

    // ── monthly_trend ─────────────────────────────────────────────────────────

    #[test]
    fn test_trend_buckets_by_month() {
        let ds = dataset(vec![
            row("2024-01-05", Value::Number(100.0)),
            row("2024-01-20", Value::Number(50.0)),
            row("2024-02-01", Value::Number(300.0)),
        ]);
        let trend = monthly_trend(&ds, "Sales", "Date");

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].month, "2024-01");
        assert!((trend[0].total - 150.0).abs() < 1e-9);
        assert_eq!(trend[1].month, "2024-02");
        assert!((trend[1].total - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_sorted_chronologically() {
        let ds = dataset(vec![
            row("2024-03-01", Value::Number(3.0)),
            row("2023-12-01", Value::Number(1.0)),
            row("2024-01-01", Value::Number(2.0)),
        ]);
        let trend = monthly_trend(&ds, "Sales", "Date");
        let months: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-03"]);
    }

    #[test]
    fn test_trend_unparseable_column_is_empty() {
        let ds = dataset(vec![
            row("north", Value::Number(1.0)),
            row("south", Value::Number(2.0)),
        ]);
        let trend = monthly_trend(&ds, "Sales", "Date");
        assert!(trend.is_empty(), "unparseable dates must degrade, not fail");
    }

    #[test]
    fn test_trend_skips_unparseable_rows() {
        let ds = dataset(vec![
            row("2024-01-05", Value::Number(100.0)),
            row("not a date", Value::Number(999.0)),
        ]);
        let trend = monthly_trend(&ds, "Sales", "Date");
        assert_eq!(trend.len(), 1);
        assert!((trend[0].total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_missing_metric_contributes_zero() {
        let ds = dataset(vec![
            row("2024-01-05", Value::Null),
            row("2024-01-20", Value::Number(10.0)),
        ]);
        let trend = monthly_trend(&ds, "Sales", "Date");
        assert_eq!(trend.len(), 1);
        assert!((trend[0].total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_unknown_columns_are_empty() {
        let ds = dataset(vec![row("2024-01-05", Value::Number(1.0))]);
        assert!(monthly_trend(&ds, "Sales", "Nope").is_empty());
        assert!(monthly_trend(&ds, "Nope", "Date").is_empty());
    }

    #[test]
    fn test_trend_date_typed_cells() {
        // Spreadsheet date cells arrive already coerced.
        let d = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let ds = dataset(vec![vec![Value::Date(d), Value::Number(7.0)]]);
        let trend = monthly_trend(&ds, "Sales", "Date");
        assert_eq!(trend[0].month, "2024-05");
    }

    // ── coerce_date / parse_date_str ──────────────────────────────────────────

    #[test]
    fn test_coerce_date_iso_date() {
        let d = coerce_date(&Value::Text("2024-01-15".to_string())).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_coerce_date_rfc3339() {
        let d = coerce_date(&Value::Text("2024-01-15T10:30:00Z".to_string())).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_coerce_date_datetime_without_zone() {
        let d = coerce_date(&Value::Text("2024-01-15 10:30:00".to_string())).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_coerce_date_slash_formats() {
        let ymd = coerce_date(&Value::Text("2024/01/15".to_string())).unwrap();
        assert_eq!(ymd, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let dmy = coerce_date(&Value::Text("15/01/2024".to_string())).unwrap();
        assert_eq!(dmy, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_coerce_date_rejects_numbers_and_null() {
        assert!(coerce_date(&Value::Number(45123.0)).is_none());
        assert!(coerce_date(&Value::Null).is_none());
    }

    #[test]
    fn test_coerce_date_rejects_garbage() {
        assert!(coerce_date(&Value::Text("brand-a".to_string())).is_none());
        assert!(coerce_date(&Value::Text(String::new())).is_none());
    }
}
