//! Dataset loading for brandboard.
//!
//! Reads delimited text (files or pasted input) and XLSX workbooks into
//! [`Dataset`] values, classifying delimited-text columns up front so that
//! downstream code never re-parses cells.

use std::fs::File;
use std::path::{Path, PathBuf};

use board_core::error::{BoardError, Result};
use board_core::models::{Dataset, Value};
use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::{debug, warn};

/// Source label used for datasets built from pasted text.
pub const PASTED_SOURCE: &str = "pasted data";

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` / `.xlsx` files recursively under `data_dir`, sorted by path.
pub fn find_data_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        let ext = ext.to_ascii_lowercase();
                        ext == "csv" || ext == "xlsx"
                    })
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load a dataset from a file path, dispatching on the extension.
///
/// `.csv` (and `.tsv` / `.txt`) are parsed as comma-delimited text with a
/// header row; `.xlsx` reads the first sheet with the format's native
/// per-cell typing.
pub fn load_path(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => load_delimited_file(path),
        "xlsx" => load_xlsx(path),
        _ => Err(BoardError::DataLoad(format!(
            "unsupported file type: {}",
            path.display()
        ))),
    }
}

/// Load a dataset from pasted delimited text (header row required).
pub fn load_pasted(text: &str) -> Result<Dataset> {
    read_delimited(text.as_bytes(), PASTED_SOURCE)
}

// ── Delimited text ────────────────────────────────────────────────────────────

fn load_delimited_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| BoardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_delimited(file, &source_label(path))
}

/// Parse a delimited-text stream into a typed dataset.
///
/// The first row is the header. A column is numeric iff it has at least one
/// non-empty cell and every non-empty cell parses as a number; empty cells
/// become `Null`. Dates are never auto-detected here; date interpretation
/// is explicit and deferred to the trend extractor.
fn read_delimited<R: std::io::Read>(reader: R, source: &str) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = header_names(rdr.headers()?.iter().map(str::to_string).collect());
    if columns.is_empty() {
        return Err(BoardError::DataLoad(
            "parsed result has zero columns".to_string(),
        ));
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in rdr.records() {
        // A ragged row (wrong field count) surfaces here as a CSV error.
        let record = record?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let numeric = classify_columns(columns.len(), &raw_rows);

    let rows: Vec<Vec<Value>> = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .enumerate()
                .map(|(idx, cell)| typed_cell(cell, numeric[idx]))
                .collect()
        })
        .collect();

    debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        columns.len(),
        source
    );

    Ok(Dataset::new(source, columns, rows))
}

/// Per-column numeric flags: true iff the column has at least one non-empty
/// cell and every non-empty cell parses as `f64`.
fn classify_columns(column_count: usize, rows: &[Vec<String>]) -> Vec<bool> {
    (0..column_count)
        .map(|idx| {
            let mut any_present = false;
            let all_parse = rows.iter().all(|row| {
                let cell = &row[idx];
                if cell.is_empty() {
                    true
                } else {
                    any_present = true;
                    cell.parse::<f64>().is_ok()
                }
            });
            any_present && all_parse
        })
        .collect()
}

fn typed_cell(cell: String, numeric: bool) -> Value {
    if cell.is_empty() {
        Value::Null
    } else if numeric {
        // classify_columns already proved every non-empty cell parses.
        match cell.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(cell),
        }
    } else {
        Value::Text(cell)
    }
}

// ── XLSX ──────────────────────────────────────────────────────────────────────

/// Read the first sheet of an XLSX workbook, first row as header, using the
/// format's native per-cell typing.
fn load_xlsx(path: &Path) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or_else(|| {
        BoardError::DataLoad("workbook contains no sheets".to_string())
    })?;

    let range = workbook.worksheet_range(first)?;
    let mut rows_iter = range.rows();

    let header_row = rows_iter.next().ok_or_else(|| {
        BoardError::DataLoad("first sheet has no header row".to_string())
    })?;
    let columns = header_names(
        header_row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => cell_value(other).display(),
            })
            .collect(),
    );
    if columns.is_empty() {
        return Err(BoardError::DataLoad(
            "parsed result has zero columns".to_string(),
        ));
    }

    let rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..columns.len())
                .map(|idx| row.get(idx).map(cell_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    debug!(
        "Loaded {} rows x {} columns from sheet '{}' of {}",
        rows.len(),
        columns.len(),
        first,
        path.display()
    );

    Ok(Dataset::new(source_label(path), columns, rows))
}

/// Map one spreadsheet cell to a typed [`Value`].
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::Error(e) => Value::Text(format!("{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Value::Date(naive.date()),
            None => Value::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => Value::Text(s.clone()),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Replace empty header cells with a synthetic positional name.
fn header_names(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.is_empty() {
                format!("Column {}", idx + 1)
            } else {
                name
            }
        })
        .collect()
}

fn source_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    // ── load_pasted ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_pasted_basic() {
        let ds = load_pasted("Brand,Sales\nA,100\nB,300\n").unwrap();
        assert_eq!(ds.source, PASTED_SOURCE);
        assert_eq!(ds.columns, vec!["Brand", "Sales"]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.rows[0][1], Value::Number(100.0));
        assert_eq!(ds.rows[1][0], Value::Text("B".to_string()));
    }

    #[test]
    fn test_load_pasted_ragged_rows_fail() {
        let err = load_pasted("Brand,Sales\nA,100,extra\n").unwrap_err();
        assert!(
            err.to_string().contains("Could not read CSV data"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_load_pasted_empty_input_is_zero_columns() {
        let err = load_pasted("").unwrap_err();
        assert!(
            err.to_string().contains("zero columns"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_load_pasted_numeric_column_with_blanks() {
        // Blank cells do not break numeric classification.
        let ds = load_pasted("Brand,Sales\nA,\nA,10\n").unwrap();
        assert_eq!(ds.rows[0][1], Value::Null);
        assert_eq!(ds.rows[1][1], Value::Number(10.0));
    }

    #[test]
    fn test_load_pasted_mixed_column_is_text() {
        let ds = load_pasted("Brand,Code\nA,12\nB,x9\n").unwrap();
        // One unparseable cell makes the whole column text, numbers included.
        assert_eq!(ds.rows[0][1], Value::Text("12".to_string()));
        assert_eq!(ds.rows[1][1], Value::Text("x9".to_string()));
    }

    #[test]
    fn test_load_pasted_all_blank_column_stays_text() {
        let ds = load_pasted("Brand,Sales\nA,\nB,\n").unwrap();
        assert_eq!(ds.rows[0][1], Value::Null);
        assert_eq!(ds.rows[1][1], Value::Null);
    }

    #[test]
    fn test_load_pasted_trims_whitespace() {
        let ds = load_pasted("Brand , Sales\n A , 100 \n").unwrap();
        assert_eq!(ds.columns, vec!["Brand", "Sales"]);
        assert_eq!(ds.rows[0][0], Value::Text("A".to_string()));
        assert_eq!(ds.rows[0][1], Value::Number(100.0));
    }

    #[test]
    fn test_load_pasted_dates_stay_text() {
        // Date interpretation is deferred; the loader never types dates.
        let ds = load_pasted("Date,Sales\n2024-01-15,100\n").unwrap();
        assert_eq!(ds.rows[0][0], Value::Text("2024-01-15".to_string()));
    }

    // ── load_path ─────────────────────────────────────────────────────────────

    #[test]
    fn test_load_path_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "sales.csv", "Brand,Sales\nA,100\n");

        let ds = load_path(&path).unwrap();
        assert_eq!(ds.source, "sales.csv");
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn test_load_path_unsupported_extension() {
        let err = load_path(Path::new("/tmp/data.parquet")).unwrap_err();
        assert!(
            err.to_string().contains("unsupported file type"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_load_path_missing_file() {
        let err = load_path(Path::new("/tmp/does-not-exist-board-test.csv")).unwrap_err();
        assert!(
            err.to_string().contains("Failed to read file"),
            "unexpected error: {err}"
        );
    }

    // ── find_data_files ───────────────────────────────────────────────────────

    #[test]
    fn test_find_data_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "b.csv", "x\n1\n");
        write_file(dir.path(), "a.csv", "x\n1\n");
        write_file(dir.path(), "notes.md", "not data");

        let files = find_data_files(dir.path());
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_find_data_files_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("2024");
        std::fs::create_dir_all(&sub).unwrap();
        write_file(dir.path(), "root.csv", "x\n1\n");
        write_file(&sub, "nested.csv", "x\n1\n");

        let files = find_data_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_find_data_files_nonexistent_dir() {
        let files = find_data_files(Path::new("/tmp/does-not-exist-board-test-xyz"));
        assert!(files.is_empty());
    }

    // ── header_names ──────────────────────────────────────────────────────────

    #[test]
    fn test_header_names_synthesises_empty_names() {
        let names = header_names(vec!["Brand".to_string(), String::new()]);
        assert_eq!(names, vec!["Brand", "Column 2"]);
    }
}
