use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};
use tracing::{debug, instrument};

use crate::qwtt::report::error::{ReportError, Result};
use crate::qwtt::report::model::{RawTable, TableKind};

/// Reads the first worksheet of a workbook as a header row plus text cells.
///
/// Integral numeric cells render without a fractional part so identifiers and
/// quantities stored as numbers compare equal to their delimited-text form.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), kind = %kind))]
pub fn read_table(path: &Path, kind: TableKind) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or_else(|| {
        ReportError::InvalidWorkbook(format!("'{}' has no worksheets", path.display()))
    })??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_to_string(Some(cell)).trim().to_string())
            .collect(),
        None => return Err(ReportError::EmptyTable(kind)),
    };
    if columns.iter().all(String::is_empty) {
        return Err(ReportError::EmptyTable(kind));
    }

    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    debug!(columns = columns.len(), rows = rows.len(), "read worksheet");
    Ok(RawTable::new(kind, columns, rows))
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
