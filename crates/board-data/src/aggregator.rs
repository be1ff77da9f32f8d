//! Group-by aggregation over a metric column.
//!
//! Computes the dashboard's summary statistics and the ranked top-N group
//! sums. Missing-value semantics: a missing metric contributes zero to sums
//! and is excluded from the mean; a missing group value forms its own single
//! bucket.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use board_core::error::{BoardError, Result};
use board_core::models::{Dataset, RankedGroup, SummaryStats, Value};

/// Number of groups shown in the bar chart and table.
pub const TOP_GROUP_LIMIT: usize = 10;

/// Number of groups in the share breakdown.
pub const SHARE_GROUP_LIMIT: usize = 5;

/// Compute summary statistics for one (metric, group) selection.
///
/// * `record_count`: total rows, regardless of missing values.
/// * `metric_sum`: sum over present metric values (missing contributes 0).
/// * `distinct_groups`: distinct group values; missing counts as one bucket
///   when present at all.
/// * `metric_mean`: mean over rows with a present metric value only; 0.0
///   when no row has one.
pub fn summarize(dataset: &Dataset, metric: &str, group: &str) -> Result<SummaryStats> {
    let metric_idx = column_index(dataset, metric)?;
    let group_idx = column_index(dataset, group)?;

    let mut sum = 0.0;
    let mut present = 0usize;
    let mut groups: HashSet<String> = HashSet::new();
    let mut saw_missing_group = false;

    for row in &dataset.rows {
        if let Some(v) = row[metric_idx].as_number() {
            sum += v;
            present += 1;
        }
        match &row[group_idx] {
            Value::Null => saw_missing_group = true,
            other => {
                groups.insert(other.group_key());
            }
        }
    }

    let mean = if present > 0 {
        sum / present as f64
    } else {
        0.0
    };

    Ok(SummaryStats {
        record_count: dataset.row_count(),
        metric_sum: sum,
        distinct_groups: groups.len() + usize::from(saw_missing_group),
        metric_mean: mean,
    })
}

/// Group rows by `group`, sum `metric` per bucket, and return the `n` largest
/// buckets in descending order of their sum.
///
/// Ties keep first-seen group order: buckets accumulate in encounter order
/// and the descending sort is stable.
pub fn top_groups(
    dataset: &Dataset,
    metric: &str,
    group: &str,
    n: usize,
) -> Result<Vec<RankedGroup>> {
    let metric_idx = column_index(dataset, metric)?;
    let group_idx = column_index(dataset, group)?;

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for row in &dataset.rows {
        let key = row[group_idx].group_key();
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        let slot = totals.entry(key).or_insert(0.0);
        if let Some(v) = row[metric_idx].as_number() {
            *slot += v;
        }
    }

    let mut ranked: Vec<RankedGroup> = order
        .into_iter()
        .map(|key| RankedGroup {
            total: totals[&key],
            group: key,
        })
        .collect();

    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    ranked.truncate(n);

    Ok(ranked)
}

fn column_index(dataset: &Dataset, name: &str) -> Result<usize> {
    dataset
        .column_index(name)
        .ok_or_else(|| BoardError::UnknownColumn(name.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
