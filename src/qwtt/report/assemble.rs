//! Joins aggregated figures with catalog attributes into the two final reports.

use crate::qwtt::report::aggregate::saturating_total;
use crate::qwtt::report::catalog::{CatalogIndex, QuantityIndex};
use crate::qwtt::report::config::ReportConfig;
use crate::qwtt::report::model::{
    AggregateTable, CostReport, CostReportRow, OutputTable, ReportSummary, StockReport,
    StockReportRow,
};
use crate::qwtt::report::numeric::round_to;

/// Sheet name and download stem for the stock report.
pub const STOCK_REPORT_NAME: &str = "inventory_sales_report";
/// Sheet name and download stem for the cost report.
pub const COST_REPORT_NAME: &str = "sales_cost_report";

/// Identifier plus the four catalog attributes lead both reports.
const TEXT_COLUMNS: usize = 5;

pub const STOCK_REPORT_COLUMNS: [&str; 7] = [
    "Asin",
    "Manager",
    "Brand",
    "Product Name",
    "Vendor SKU",
    "Stock",
    "Sales QTY",
];

pub const COST_REPORT_COLUMNS: [&str; 9] = [
    "Asin",
    "Manager",
    "Brand",
    "Product Name",
    "Vendor SKU",
    "Stock",
    "CP",
    "Stock Value",
    "QWTT Units",
];

/// Builds Report A.
///
/// Rows are sorted ascending by sales quantity (stable, so ties keep aggregate
/// order) and the grand total is emitted last. Its sales quantity is the sum of
/// the joined per-row values rather than anything carried by `stock`.
pub fn build_stock_report(
    stock: &AggregateTable,
    sales: &QuantityIndex,
    catalog: &CatalogIndex,
    config: &ReportConfig,
) -> StockReport {
    let mut rows: Vec<StockReportRow> = stock
        .rows
        .iter()
        .map(|group| {
            let record = catalog.lookup(&group.identifier);
            StockReportRow {
                asin: group.identifier.clone(),
                manager: record.manager.clone(),
                brand: record.brand.clone(),
                product_name: record.product_name.clone(),
                vendor_sku: record.vendor_sku.clone(),
                stock: group.value,
                sales_qty: sales.get(&group.identifier),
            }
        })
        .collect();

    rows.sort_by_key(|row| row.sales_qty);

    let grand_total = StockReportRow {
        asin: config.grand_total_label.clone(),
        manager: String::new(),
        brand: String::new(),
        product_name: String::new(),
        vendor_sku: String::new(),
        stock: stock.grand_total,
        sales_qty: saturating_total(rows.iter().map(|row| row.sales_qty)),
    };

    StockReport { rows, grand_total }
}

/// Builds Report B in the natural order of the stock aggregate.
///
/// The grand-total cost price is the stock-weighted average
/// `Σ(cp × stock) / Σ stock`, and `0` when there is no stock at all.
pub fn build_cost_report(
    stock: &AggregateTable,
    units: &QuantityIndex,
    catalog: &CatalogIndex,
    config: &ReportConfig,
) -> CostReport {
    let rows: Vec<CostReportRow> = stock
        .rows
        .iter()
        .map(|group| {
            let record = catalog.lookup(&group.identifier);
            CostReportRow {
                asin: group.identifier.clone(),
                manager: record.manager.clone(),
                brand: record.brand.clone(),
                product_name: record.product_name.clone(),
                vendor_sku: record.vendor_sku.clone(),
                stock: group.value,
                cost_price: record.cost_price,
                stock_value: record.cost_price * group.value as f64,
                units: units.get(&group.identifier),
            }
        })
        .collect();

    let total_stock = saturating_total(rows.iter().map(|row| row.stock));
    let total_value: f64 = rows.iter().map(|row| row.stock_value).sum();
    let weighted_cost = if total_stock == 0 {
        0.0
    } else {
        round_to(total_value / total_stock as f64, config.cost_price_decimals)
    };

    let grand_total = CostReportRow {
        asin: config.grand_total_label.clone(),
        manager: String::new(),
        brand: String::new(),
        product_name: String::new(),
        vendor_sku: String::new(),
        stock: total_stock,
        cost_price: weighted_cost,
        stock_value: total_value,
        units: saturating_total(rows.iter().map(|row| row.units)),
    };

    CostReport { rows, grand_total }
}

/// Headline metrics for the stock report, excluding the grand-total row.
pub fn summarize(report: &StockReport) -> ReportSummary {
    let total_stock = saturating_total(report.rows.iter().map(|row| row.stock));
    let total_sales = saturating_total(report.rows.iter().map(|row| row.sales_qty));
    let sell_through_pct = if total_stock > 0 {
        total_sales as f64 / total_stock as f64 * 100.0
    } else {
        0.0
    };

    ReportSummary {
        product_count: report.rows.len(),
        total_stock,
        total_sales,
        sell_through_pct,
    }
}

impl StockReport {
    /// Flattens the report for export with the grand total as the last row.
    pub fn to_table(&self) -> OutputTable {
        let rows = self
            .rows
            .iter()
            .chain(std::iter::once(&self.grand_total))
            .map(|row| {
                vec![
                    row.asin.clone(),
                    row.manager.clone(),
                    row.brand.clone(),
                    row.product_name.clone(),
                    row.vendor_sku.clone(),
                    row.stock.to_string(),
                    row.sales_qty.to_string(),
                ]
            })
            .collect();

        OutputTable {
            sheet_name: STOCK_REPORT_NAME.to_string(),
            columns: STOCK_REPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            text_columns: TEXT_COLUMNS,
            rows,
        }
    }
}

impl CostReport {
    /// Flattens the report for export with the grand total as the last row.
    pub fn to_table(&self) -> OutputTable {
        let rows = self
            .rows
            .iter()
            .chain(std::iter::once(&self.grand_total))
            .map(|row| {
                vec![
                    row.asin.clone(),
                    row.manager.clone(),
                    row.brand.clone(),
                    row.product_name.clone(),
                    row.vendor_sku.clone(),
                    row.stock.to_string(),
                    row.cost_price.to_string(),
                    row.stock_value.to_string(),
                    row.units.to_string(),
                ]
            })
            .collect();

        OutputTable {
            sheet_name: COST_REPORT_NAME.to_string(),
            columns: COST_REPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            text_columns: TEXT_COLUMNS,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qwtt::report::aggregate::aggregate;
    use crate::qwtt::report::model::{RawTable, TableKind};

    fn catalog(rows: &[[&str; 6]]) -> CatalogIndex {
        let table = RawTable::new(
            TableKind::ProductMaster,
            ["ASIN", "Manager", "Brand", "Product Name", "Vendor SKU", "CP"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        CatalogIndex::from_table(&table).expect("catalog indexed")
    }

    #[test]
    fn stock_rows_sorted_by_sales_with_total_last() {
        let stock = aggregate([("A", "1"), ("B", "2"), ("C", "3")]);
        let sales =
            QuantityIndex::from_aggregate(&aggregate([("A", "30"), ("B", "10"), ("C", "20")]));
        let report = build_stock_report(&stock, &sales, &catalog(&[]), &ReportConfig::default());

        let order: Vec<i64> = report.rows.iter().map(|row| row.sales_qty).collect();
        assert_eq!(order, vec![10, 20, 30]);

        let table = report.to_table();
        let last = table.rows.last().expect("grand total row");
        assert_eq!(last[0], "Grand Total");
        assert_eq!(last[5], "6");
        assert_eq!(last[6], "60");
    }

    #[test]
    fn stock_sort_is_stable_for_ties() {
        let stock = aggregate([("A", "1"), ("B", "1"), ("C", "1")]);
        let sales = QuantityIndex::from_aggregate(&aggregate([("C", "5")]));
        let report = build_stock_report(&stock, &sales, &catalog(&[]), &ReportConfig::default());
        let order: Vec<&str> = report.rows.iter().map(|row| row.asin.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn stock_totals_match_rows() {
        let stock = aggregate([("A", "4"), ("B", "6"), (" A ", "1")]);
        let sales = QuantityIndex::from_aggregate(&aggregate([("A", "2"), ("B", "3")]));
        let report = build_stock_report(&stock, &sales, &catalog(&[]), &ReportConfig::default());

        let stock_sum: i64 = report.rows.iter().map(|row| row.stock).sum();
        let sales_sum: i64 = report.rows.iter().map(|row| row.sales_qty).sum();
        assert_eq!(report.grand_total.stock, stock_sum);
        assert_eq!(report.grand_total.sales_qty, sales_sum);
        assert_eq!(sales_sum, 2 + 3 + 2);
    }

    #[test]
    fn absent_catalog_attributes_render_empty() {
        let stock = aggregate([("A1", "100")]);
        let report = build_stock_report(
            &stock,
            &QuantityIndex::default(),
            &catalog(&[["B9", "M", "Brand", "Name", "SKU", "1"]]),
            &ReportConfig::default(),
        );
        let table = report.to_table();
        assert_eq!(table.rows[0], vec!["A1", "", "", "", "", "100", "0"]);
    }

    #[test]
    fn weighted_cost_price_on_total_row() {
        let stock = aggregate([("A", "10"), ("B", "5")]);
        let index = catalog(&[
            ["A", "M", "Acme", "Alpha", "A-1", "2.0"],
            ["B", "M", "Acme", "Beta", "B-1", "4.0"],
        ]);
        let units = QuantityIndex::from_aggregate(&aggregate([("A", "3"), ("B", "4")]));
        let report = build_cost_report(&stock, &units, &index, &ReportConfig::default());

        assert_eq!(report.rows[0].stock_value, 20.0);
        assert_eq!(report.rows[1].stock_value, 20.0);
        assert_eq!(report.grand_total.stock, 15);
        assert_eq!(report.grand_total.units, 7);
        assert_eq!(report.grand_total.stock_value, 40.0);
        assert_eq!(report.grand_total.cost_price, 2.67);
    }

    #[test]
    fn zero_stock_gives_zero_cost_price() {
        let stock = aggregate([("A", "0")]);
        let index = catalog(&[["A", "M", "Acme", "Alpha", "A-1", "9.5"]]);
        let report = build_cost_report(
            &stock,
            &QuantityIndex::default(),
            &index,
            &ReportConfig::default(),
        );
        assert_eq!(report.grand_total.cost_price, 0.0);
        assert_eq!(report.rows[0].units, 0);
    }

    #[test]
    fn cost_report_keeps_aggregate_order() {
        let stock = aggregate([("C", "1"), ("A", "1"), ("B", "1")]);
        let report = build_cost_report(
            &stock,
            &QuantityIndex::default(),
            &catalog(&[]),
            &ReportConfig::default(),
        );
        let order: Vec<&str> = report.rows.iter().map(|row| row.asin.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(report.to_table().rows.last().expect("total")[0], "Grand Total");
    }

    #[test]
    fn oversized_totals_saturate_instead_of_wrapping() {
        let stock = aggregate([("A", "9223372036854775807"), ("B", "10")]);
        let sales = QuantityIndex::from_aggregate(&aggregate([
            ("A", "9223372036854775807"),
            ("B", "10"),
        ]));
        let index = catalog(&[]);
        let config = ReportConfig::default();

        let stock_report = build_stock_report(&stock, &sales, &index, &config);
        assert_eq!(stock_report.grand_total.stock, i64::MAX);
        assert_eq!(stock_report.grand_total.sales_qty, i64::MAX);
        assert_eq!(summarize(&stock_report).total_sales, i64::MAX);

        let cost_report = build_cost_report(&stock, &sales, &index, &config);
        assert_eq!(cost_report.grand_total.stock, i64::MAX);
        assert_eq!(cost_report.grand_total.units, i64::MAX);
    }

    #[test]
    fn summary_excludes_grand_total() {
        let stock = aggregate([("A", "50"), ("B", "150")]);
        let sales = QuantityIndex::from_aggregate(&aggregate([("A", "20"), ("B", "30")]));
        let report = build_stock_report(&stock, &sales, &catalog(&[]), &ReportConfig::default());
        let summary = summarize(&report);
        assert_eq!(summary.product_count, 2);
        assert_eq!(summary.total_stock, 200);
        assert_eq!(summary.total_sales, 50);
        assert_eq!(summary.sell_through_pct, 25.0);
    }
}
