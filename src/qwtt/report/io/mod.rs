//! Adapters between files on disk and the pipeline's [`RawTable`] /
//! [`OutputTable`] shapes.
//!
//! [`RawTable`]: crate::qwtt::report::model::RawTable
//! [`OutputTable`]: crate::qwtt::report::model::OutputTable

pub mod delimited;
pub mod excel_read;
pub mod excel_write;

use std::path::Path;

use crate::qwtt::report::error::{ReportError, Result};
use crate::qwtt::report::model::{RawTable, TableKind};

/// Loads an input table, choosing the reader from the file extension.
pub fn load_table(path: &Path, kind: TableKind) -> Result<RawTable> {
    if !path.exists() {
        return Err(ReportError::MissingInput(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") | Some("txt") => delimited::read_table_file(path, kind),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods") => {
            excel_read::read_table(path, kind)
        }
        _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
    }
}
