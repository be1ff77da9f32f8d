//! Explicit up-front column classification.
//!
//! Produces one [`ColumnDescriptor`] per column so downstream code can match
//! on kinds instead of re-parsing cells.

use board_core::error::{BoardError, Result};
use board_core::models::{ColumnDescriptor, ColumnKind, Dataset, Value};

/// Classify every column of `dataset`, in original header order.
///
/// A column is numeric iff it has at least one present value and every
/// present value is a number. A column with zero data rows, or with only
/// empty cells, is text; there is nothing meaningful to aggregate over.
pub fn inspect(dataset: &Dataset) -> Vec<ColumnDescriptor> {
    dataset
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut present = 0usize;
            let mut numeric = true;
            for row in &dataset.rows {
                match &row[idx] {
                    Value::Null => {}
                    Value::Number(_) => present += 1,
                    _ => {
                        present += 1;
                        numeric = false;
                    }
                }
            }
            let kind = if numeric && present > 0 {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            };
            ColumnDescriptor {
                name: name.clone(),
                kind,
            }
        })
        .collect()
}

/// Names of the numeric columns, header order preserved.
pub fn numeric_columns(descriptors: &[ColumnDescriptor]) -> Vec<String> {
    descriptors
        .iter()
        .filter(|d| d.is_numeric())
        .map(|d| d.name.clone())
        .collect()
}

/// All column names, header order preserved.
pub fn all_columns(descriptors: &[ColumnDescriptor]) -> Vec<String> {
    descriptors.iter().map(|d| d.name.clone()).collect()
}

/// Fail with [`BoardError::NoNumericColumns`] when no column can serve as a
/// metric. Callers halt the pipeline and surface the message to the user.
pub fn ensure_numeric_available(descriptors: &[ColumnDescriptor]) -> Result<()> {
    if descriptors.iter().any(|d| d.is_numeric()) {
        Ok(())
    } else {
        Err(BoardError::NoNumericColumns)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
