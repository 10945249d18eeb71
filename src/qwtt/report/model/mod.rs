use std::fmt;

use serde::{Deserialize, Serialize};

/// Product identifier shared by every input table (the ASIN).
pub type Identifier = String;

/// The four fixed input shapes the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Warehouse inventory export carrying `Asin` and `Sellable`.
    Inventory,
    /// Sales/business report with ordered item counts.
    BusinessReport,
    /// Product master catalog with brand, manager and cost attributes.
    ProductMaster,
    /// Third-party fulfillment (QWTT) order export.
    Fulfillment,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Inventory => write!(f, "inventory file"),
            TableKind::BusinessReport => write!(f, "business report"),
            TableKind::ProductMaster => write!(f, "product master"),
            TableKind::Fulfillment => write!(f, "fulfillment order export"),
        }
    }
}

/// A parsed input table: a header row plus text cells.
///
/// Rows may be ragged; missing trailing cells read as the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub kind: TableKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(kind: TableKind, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            kind,
            columns,
            rows,
        }
    }

    /// Returns the cell at `column` for `row`, or `""` when the row is short.
    pub fn cell<'a>(row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    /// Iterates `(identifier, value)` text pairs for two column positions.
    pub fn pairs(
        &self,
        identifier: usize,
        value: usize,
    ) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.rows
            .iter()
            .map(move |row| (Self::cell(row, identifier), Self::cell(row, value)))
    }
}

/// One grouped identifier with its summed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub identifier: Identifier,
    pub value: i64,
}

/// Grouped rows plus the synthetic grand-total.
///
/// The grand total is kept apart from the groups so it can never be sorted,
/// joined, or double counted with them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateTable {
    pub rows: Vec<AggregateRow>,
    pub grand_total: i64,
}

impl AggregateTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Catalog attributes for one identifier. The default is the record used for
/// identifiers absent from the product master.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub manager: String,
    pub brand: String,
    pub product_name: String,
    pub vendor_sku: String,
    pub cost_price: f64,
}

/// A row of the inventory/stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReportRow {
    pub asin: Identifier,
    pub manager: String,
    pub brand: String,
    pub product_name: String,
    pub vendor_sku: String,
    pub stock: i64,
    pub sales_qty: i64,
}

/// Report A: stock joined with sales, sorted ascending by sales quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    pub rows: Vec<StockReportRow>,
    pub grand_total: StockReportRow,
}

/// A row of the sales-with-cost report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReportRow {
    pub asin: Identifier,
    pub manager: String,
    pub brand: String,
    pub product_name: String,
    pub vendor_sku: String,
    pub stock: i64,
    pub cost_price: f64,
    pub stock_value: f64,
    pub units: i64,
}

/// Report B: stock valued at cost alongside fulfillment units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub rows: Vec<CostReportRow>,
    pub grand_total: CostReportRow,
}

/// Headline figures shown next to the stock report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub product_count: usize,
    pub total_stock: i64,
    pub total_sales: i64,
    pub sell_through_pct: f64,
}

/// A finished report flattened to header + text rows, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    /// Number of leading columns holding text; the remaining columns are numeric.
    pub text_columns: usize,
    pub rows: Vec<Vec<String>>,
}
