use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by brandboard.
#[derive(Error, Debug)]
pub enum BoardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input could not be interpreted as tabular data.
    #[error("Could not load data: {0}")]
    DataLoad(String),

    /// A delimited-text stream could not be parsed.
    #[error("Could not read CSV data: {0}")]
    CsvParse(#[from] csv::Error),

    /// An XLSX workbook could not be opened or read.
    #[error("Could not read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    /// The loaded dataset has no column usable as a metric.
    #[error("No numeric columns found for analysis")]
    NoNumericColumns,

    /// A selected column name does not exist in the dataset.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A column selected as the metric is not numeric.
    #[error("Column is not numeric: {0}")]
    NotNumeric(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the brandboard crates.
pub type Result<T> = std::result::Result<T, BoardError>;
