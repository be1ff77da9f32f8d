//! Per-session state for one brandboard run.
//!
//! The session is an explicit context object owned by the event loop: it is
//! created at startup, unlocked through the gate, replaced wholesale on each
//! data load, and cleared again on lock. No process-wide mutable state.

use board_core::error::Result;
use board_core::models::{ColumnDescriptor, Dataset};
use board_data::schema;
use tracing::info;

/// All state scoped to one interactive session.
///
/// The gate is a plaintext shared-secret comparison kept for parity with a
/// shared-terminal deployment. It is a convenience lock, not an
/// authentication boundary.
#[derive(Debug)]
pub struct Session {
    access_code: String,
    authenticated: bool,
    dataset: Option<Dataset>,
    descriptors: Vec<ColumnDescriptor>,
    metric: Option<String>,
    group: Option<String>,
    date_col: Option<String>,
}

impl Session {
    /// Create a locked session with no data.
    pub fn new(access_code: impl Into<String>) -> Self {
        Self {
            access_code: access_code.into(),
            authenticated: false,
            dataset: None,
            descriptors: Vec::new(),
            metric: None,
            group: None,
            date_col: None,
        }
    }

    // ── Gate ──────────────────────────────────────────────────────────────────

    pub fn is_unlocked(&self) -> bool {
        self.authenticated
    }

    /// Compare `attempt` against the shared access code.
    pub fn unlock(&mut self, attempt: &str) -> bool {
        self.authenticated = attempt == self.access_code;
        self.authenticated
    }

    /// Return to the gate, discarding the loaded dataset and selections.
    pub fn lock(&mut self) {
        self.authenticated = false;
        self.dataset = None;
        self.descriptors.clear();
        self.metric = None;
        self.group = None;
        self.date_col = None;
    }

    // ── Dataset lifecycle ─────────────────────────────────────────────────────

    /// Install a freshly loaded dataset, replacing any previous one.
    ///
    /// Classifies columns and resets selections to their defaults: first
    /// numeric column as metric, first column as group, no date column.
    /// Fails with `NoNumericColumns` when the dataset has no usable metric,
    /// in which case the previously installed dataset (if any) is untouched.
    pub fn install(&mut self, dataset: Dataset) -> Result<()> {
        let descriptors = schema::inspect(&dataset);
        schema::ensure_numeric_available(&descriptors)?;

        let numeric = schema::numeric_columns(&descriptors);
        self.metric = numeric.first().cloned();
        self.group = dataset.columns.first().cloned();
        self.date_col = None;

        info!(
            "Installed dataset '{}': {} rows x {} columns",
            dataset.source,
            dataset.row_count(),
            dataset.column_count()
        );

        self.descriptors = descriptors;
        self.dataset = Some(dataset);
        Ok(())
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    // ── Selections ────────────────────────────────────────────────────────────

    pub fn metric(&self) -> Option<&str> {
        self.metric.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn date_col(&self) -> Option<&str> {
        self.date_col.as_deref()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        schema::numeric_columns(&self.descriptors)
    }

    /// Advance the metric selection to the next numeric column, wrapping.
    pub fn cycle_metric(&mut self) {
        let options = self.numeric_columns();
        self.metric = next_in(&options, self.metric.as_deref());
    }

    /// Advance the group selection to the next column, wrapping.
    pub fn cycle_group(&mut self) {
        let options = schema::all_columns(&self.descriptors);
        self.group = next_in(&options, self.group.as_deref());
    }

    /// Advance the date-column selection through "none" and every column.
    pub fn cycle_date(&mut self) {
        let options = schema::all_columns(&self.descriptors);
        self.date_col = match self.date_col.as_deref() {
            None => options.first().cloned(),
            Some(current) => {
                let idx = options.iter().position(|c| c == current);
                match idx {
                    Some(i) if i + 1 < options.len() => Some(options[i + 1].clone()),
                    // Past the last column: back to "none".
                    _ => None,
                }
            }
        };
    }
}

/// The element after `current` in `options`, wrapping; the first element when
/// `current` is absent.
fn next_in(options: &[String], current: Option<&str>) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let idx = current
        .and_then(|c| options.iter().position(|o| o == c))
        .map(|i| (i + 1) % options.len())
        .unwrap_or(0);
    Some(options[idx].clone())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
