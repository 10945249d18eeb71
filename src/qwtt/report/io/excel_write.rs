use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, instrument};

use crate::qwtt::report::error::Result;
use crate::qwtt::report::model::OutputTable;

/// Writes each report to its own worksheet of a single workbook.
///
/// Numeric columns are stored as numbers; the final row (the grand total) is
/// emphasised in bold.
#[instrument(level = "info", skip_all, fields(path = %path.display(), sheets = tables.len()))]
pub fn write_workbook(path: &Path, tables: &[OutputTable]) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let bold = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;
        write_sheet(worksheet, table, &bold)?;
        debug!(sheet = %table.sheet_name, rows = table.rows.len(), "worksheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, table: &OutputTable, bold: &Format) -> Result<()> {
    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, bold)?;
    }

    let last_row = table.rows.len();
    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = (row_idx + 1) as u32;
        let emphasise = row_idx + 1 == last_row;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            let number = if col_idx >= table.text_columns {
                cell.parse::<f64>().ok()
            } else {
                None
            };
            match (number, emphasise) {
                (Some(value), true) => {
                    worksheet.write_number_with_format(sheet_row, col, value, bold)?;
                }
                (Some(value), false) => {
                    worksheet.write_number(sheet_row, col, value)?;
                }
                (None, true) => {
                    worksheet.write_string_with_format(sheet_row, col, cell, bold)?;
                }
                (None, false) => {
                    worksheet.write_string(sheet_row, col, cell)?;
                }
            }
        }
    }

    let mut excel_table = rust_xlsxwriter::Table::new();
    excel_table.set_autofilter(true);
    let col_end = (table.columns.len() as u16).saturating_sub(1);
    let row_end = table.rows.len() as u32;
    if row_end > 0 {
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }
    Ok(())
}
