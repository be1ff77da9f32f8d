use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single typed cell value.
///
/// `Date` only ever appears after explicit coercion (spreadsheet date cells
/// or the trend extractor's per-row parsing); delimited-text loading produces
/// only `Number`, `Text`, and `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A numeric cell (integer or floating point).
    Number(f64),
    /// A textual cell.
    Text(String),
    /// A calendar date cell.
    Date(NaiveDate),
    /// An empty / missing cell.
    Null,
}

impl Value {
    /// The numeric content of the cell, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether the cell is empty.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string used when this cell acts as a grouping key.
    ///
    /// Whole numbers drop their fractional part so `42.0` groups as `"42"`.
    /// Missing cells share the single `"(blank)"` bucket.
    pub fn group_key(&self) -> String {
        match self {
            Value::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Null => "(blank)".to_string(),
        }
    }

    /// Human-readable rendering for raw-data display.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            other => other.group_key(),
        }
    }
}

/// Inferred classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every present value in the column is a number.
    Numeric,
    /// Anything else, including columns with no data rows.
    Text,
}

/// A column name together with its inferred kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

/// The in-memory tabular result of one load operation.
///
/// Every row holds exactly `columns.len()` cells; column order is the input
/// header order. The dataset is immutable after load: the trend extractor
/// coerces dates into its own working values and never writes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Display label of where the data came from (file name or "pasted data").
    pub source: String,
    /// Column names in original header order.
    pub columns: Vec<String>,
    /// Row-major cell data.
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(source: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            source: source.into(),
            columns,
            rows,
        }
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of `name` in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Summary statistics for one (metric, group) selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Total row count, including rows with a missing metric value.
    pub record_count: usize,
    /// Sum of the metric over all rows; missing values contribute zero.
    pub metric_sum: f64,
    /// Count of distinct group values; missing counts as one bucket if present.
    pub distinct_groups: usize,
    /// Mean of the metric over rows with a present value only.
    pub metric_mean: f64,
}

/// One group bucket with its summed metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub group: String,
    pub total: f64,
}

/// One calendar-month bucket of the trend, keyed by a `"YYYY-MM"` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: String,
    pub total: f64,
}
