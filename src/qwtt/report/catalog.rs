//! Identifier-keyed lookups used by the report joins.
//!
//! All keys are trimmed on insert and on lookup, so `" X123 "` and `"X123"`
//! resolve to the same entry.

use std::collections::HashMap;

use tracing::debug;

use crate::qwtt::report::columns::{ColumnRole, require, resolve};
use crate::qwtt::report::error::Result;
use crate::qwtt::report::model::{AggregateTable, CatalogRecord, RawTable};
use crate::qwtt::report::numeric::normalize;

/// Full catalog record per identifier, built from the product master.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: HashMap<String, CatalogRecord>,
    absent: CatalogRecord,
}

impl CatalogIndex {
    /// Builds the index from the product master table.
    ///
    /// The cost-price column is optional; without it every cost price is `0`.
    /// When an identifier appears more than once the last row wins.
    pub fn from_table(table: &RawTable) -> Result<Self> {
        let kind = table.kind;
        let identifier = require(&table.columns, kind, ColumnRole::Identifier)?;
        let manager = require(&table.columns, kind, ColumnRole::CatalogManager)?;
        let brand = require(&table.columns, kind, ColumnRole::CatalogBrand)?;
        let product_name = require(&table.columns, kind, ColumnRole::CatalogProductName)?;
        let vendor_sku = require(&table.columns, kind, ColumnRole::CatalogVendorSku)?;
        let cost_price = resolve(&table.columns, kind, ColumnRole::CatalogCostPrice);

        let mut records = HashMap::with_capacity(table.rows.len());
        for row in &table.rows {
            let key = RawTable::cell(row, identifier.index).trim();
            if key.is_empty() {
                continue;
            }
            let record = CatalogRecord {
                manager: RawTable::cell(row, manager.index).to_string(),
                brand: RawTable::cell(row, brand.index).to_string(),
                product_name: RawTable::cell(row, product_name.index).to_string(),
                vendor_sku: RawTable::cell(row, vendor_sku.index).to_string(),
                cost_price: cost_price
                    .as_ref()
                    .map(|column| normalize(RawTable::cell(row, column.index)))
                    .unwrap_or(0.0),
            };
            records.insert(key.to_string(), record);
        }

        debug!(
            products = records.len(),
            has_cost_price = cost_price.is_some(),
            "indexed product master"
        );
        Ok(Self {
            records,
            absent: CatalogRecord::default(),
        })
    }

    /// Record for `identifier`, or the empty default record when unknown.
    pub fn lookup(&self, identifier: &str) -> &CatalogRecord {
        self.records
            .get(identifier.trim())
            .unwrap_or(&self.absent)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Identifier → quantity map for joined (not aggregated-in-place) figures such
/// as sales quantity and fulfillment units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityIndex {
    quantities: HashMap<String, i64>,
}

impl QuantityIndex {
    /// Folds aggregate groups onto trimmed identifiers, summing groups that
    /// differ only by surrounding whitespace.
    pub fn from_aggregate(table: &AggregateTable) -> Self {
        let mut quantities: HashMap<String, i64> = HashMap::with_capacity(table.len());
        for row in &table.rows {
            let total = quantities
                .entry(row.identifier.trim().to_string())
                .or_insert(0);
            *total = total.saturating_add(row.value);
        }
        Self { quantities }
    }

    /// Quantity for `identifier`; unknown identifiers read as `0`.
    pub fn get(&self, identifier: &str) -> i64 {
        self.quantities
            .get(identifier.trim())
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qwtt::report::aggregate::aggregate;
    use crate::qwtt::report::model::TableKind;

    fn product_master(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            TableKind::ProductMaster,
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn lookup_is_trim_invariant() {
        let table = product_master(
            &["ASIN", "Manager", "Brand", "Product Name", "Vendor SKU", "CP"],
            &[&[" X123 ", "Asha", "Acme", "Widget", "W-1", "₹12.50"]],
        );
        let index = CatalogIndex::from_table(&table).expect("catalog indexed");
        assert_eq!(index.lookup("X123").brand, "Acme");
        assert_eq!(index.lookup("  X123").cost_price, 12.5);
        assert_eq!(index.lookup("X123 ").product_name, "Widget");
    }

    #[test]
    fn unknown_identifier_gets_empty_record() {
        let table = product_master(
            &["asin", "manager", "brand", "product name", "vendor sku"],
            &[&["A1", "M", "B", "P", "V"]],
        );
        let index = CatalogIndex::from_table(&table).expect("catalog indexed");
        assert_eq!(index.lookup("ZZZ"), &CatalogRecord::default());
        assert_eq!(index.lookup("A1").cost_price, 0.0);
    }

    #[test]
    fn missing_manager_column_is_fatal() {
        let table = product_master(&["asin", "brand", "product name", "vendor sku"], &[]);
        assert!(CatalogIndex::from_table(&table).is_err());
    }

    #[test]
    fn duplicate_identifier_last_row_wins() {
        let table = product_master(
            &["asin", "manager", "brand", "product name", "vendor sku"],
            &[&["A1", "Old", "B", "P", "V"], &["A1", "New", "B", "P", "V"]],
        );
        let index = CatalogIndex::from_table(&table).expect("catalog indexed");
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("A1").manager, "New");
    }

    #[test]
    fn quantities_merge_whitespace_variants() {
        let sales = aggregate([(" A1", "1,200"), ("A1", "3"), ("B2", "x")]);
        let index = QuantityIndex::from_aggregate(&sales);
        assert_eq!(index.get("A1"), 1203);
        assert_eq!(index.get("B2 "), 0);
        assert_eq!(index.get("C3"), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn merged_quantities_saturate() {
        let sales = aggregate([(" A1", "9223372036854775807"), ("A1", "5")]);
        let index = QuantityIndex::from_aggregate(&sales);
        assert_eq!(index.get("A1"), i64::MAX);
    }
}
