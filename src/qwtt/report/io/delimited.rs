use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::qwtt::report::error::{ReportError, Result};
use crate::qwtt::report::model::{OutputTable, RawTable, TableKind};

/// Reads a comma-separated table with a header row from any reader.
///
/// Rows may have fewer or more fields than the header. Invalid UTF-8 is
/// replaced rather than rejected, and fully blank lines are skipped.
pub fn read_table<R: Read>(reader: R, kind: TableKind) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|field| String::from_utf8_lossy(field).trim().to_string())
        .collect();
    if columns.iter().all(String::is_empty) {
        return Err(ReportError::EmptyTable(kind));
    }

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let row: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    debug!(%kind, columns = columns.len(), rows = rows.len(), "read delimited table");
    Ok(RawTable::new(kind, columns, rows))
}

/// Reads a comma-separated table from disk.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), kind = %kind))]
pub fn read_table_file(path: &Path, kind: TableKind) -> Result<RawTable> {
    let file = File::open(path)?;
    read_table(file, kind)
}

/// Writes a report as UTF-8 comma-separated text with a header row.
pub fn write_table<W: Write>(writer: W, table: &OutputTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a report to `path` as comma-separated text.
#[instrument(
    level = "debug",
    skip_all,
    fields(path = %path.display(), rows = table.rows.len())
)]
pub fn write_table_file(path: &Path, table: &OutputTable) -> Result<()> {
    let file = File::create(path)?;
    write_table(file, table)
}

/// Renders a report to an in-memory CSV document, as offered for download.
pub fn to_csv_bytes(table: &OutputTable) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, table)?;
    Ok(buffer)
}
