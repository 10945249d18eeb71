use std::path::PathBuf;

use thiserror::Error;

use crate::qwtt::report::columns::ColumnRole;
use crate::qwtt::report::model::TableKind;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the failures that abort a report-generation run.
///
/// Malformed numeric cells and a zero stock total are deliberately absent:
/// both degrade to `0` inside the pipeline instead of surfacing here.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON configuration cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the delimited-text reader or writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a workbook has no usable worksheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a required semantic column cannot be located in a table.
    #[error("couldn't detect the {role} column in the {table}")]
    ColumnNotFound { table: TableKind, role: ColumnRole },

    /// Raised when a required input table was not supplied at all.
    #[error("missing required input: {0}")]
    MissingTable(TableKind),

    /// Raised when an input table has no header row.
    #[error("{0} has no header row")]
    EmptyTable(TableKind),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when an input file extension is neither delimited text nor Excel.
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
