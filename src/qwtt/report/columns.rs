//! Semantic column detection across heterogeneously named exports.
//!
//! Every input table is probed once per run: each [`ColumnRole`] carries a
//! [`MatchRule`] and the first column (in header order) that satisfies the rule
//! is taken. When several columns qualify the ambiguity is logged, since the
//! first-match policy is a heuristic and not a schema contract.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::qwtt::report::error::{ReportError, Result};
use crate::qwtt::report::model::TableKind;

/// Semantic tag for a column that the pipeline needs to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Identifier,
    QuantitySold,
    QuantityOnHand,
    Status,
    MonetaryValue,
    Units,
    CatalogBrand,
    CatalogManager,
    CatalogProductName,
    CatalogVendorSku,
    CatalogCostPrice,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnRole::Identifier => "ASIN",
            ColumnRole::QuantitySold => "order items",
            ColumnRole::QuantityOnHand => "sellable stock",
            ColumnRole::Status => "status",
            ColumnRole::MonetaryValue => "order value",
            ColumnRole::Units => "units",
            ColumnRole::CatalogBrand => "brand",
            ColumnRole::CatalogManager => "manager",
            ColumnRole::CatalogProductName => "product name",
            ColumnRole::CatalogVendorSku => "vendor SKU",
            ColumnRole::CatalogCostPrice => "cost price",
        };
        f.write_str(label)
    }
}

/// How a header is tested against a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Case-sensitive equality with a fixed header.
    Exact(&'static str),
    /// Case-insensitive equality.
    Equals(&'static str),
    /// Case-insensitive substring match against any of the keywords.
    ContainsAny(&'static [&'static str]),
    /// Case-insensitive substring match against every keyword.
    ContainsAll(&'static [&'static str]),
}

impl MatchRule {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            MatchRule::Exact(name) => header == *name,
            MatchRule::Equals(name) => header.to_lowercase() == name.to_lowercase(),
            MatchRule::ContainsAny(keywords) => {
                let lowered = header.to_lowercase();
                keywords.iter().any(|keyword| lowered.contains(keyword))
            }
            MatchRule::ContainsAll(keywords) => {
                let lowered = header.to_lowercase();
                keywords.iter().all(|keyword| lowered.contains(keyword))
            }
        }
    }
}

impl ColumnRole {
    /// Keyword rule used for this role in every table except the inventory
    /// export, whose two headers are fixed.
    pub fn rule(self) -> MatchRule {
        match self {
            ColumnRole::Identifier => MatchRule::ContainsAny(&["asin"]),
            ColumnRole::QuantitySold => MatchRule::ContainsAny(&["total order items", "order items"]),
            ColumnRole::QuantityOnHand => MatchRule::Exact("Sellable"),
            ColumnRole::Status => MatchRule::ContainsAny(&["status"]),
            ColumnRole::MonetaryValue => MatchRule::ContainsAny(&["order value"]),
            ColumnRole::Units => MatchRule::ContainsAny(&["units", "quantity", "qty"]),
            ColumnRole::CatalogBrand => MatchRule::Equals("brand"),
            ColumnRole::CatalogManager => MatchRule::ContainsAny(&["manager"]),
            ColumnRole::CatalogProductName => MatchRule::ContainsAll(&["product", "name"]),
            ColumnRole::CatalogVendorSku => MatchRule::ContainsAll(&["vendor", "sku"]),
            ColumnRole::CatalogCostPrice => MatchRule::Equals("cp"),
        }
    }

    /// Rule for this role within a specific table.
    pub fn rule_for(self, table: TableKind) -> MatchRule {
        match (table, self) {
            (TableKind::Inventory, ColumnRole::Identifier) => MatchRule::Exact("Asin"),
            (TableKind::Inventory, ColumnRole::QuantityOnHand) => MatchRule::Exact("Sellable"),
            _ => self.rule(),
        }
    }
}

/// A column located for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
}

/// Every column position that satisfies `rule`, in header order.
pub fn candidates<S: AsRef<str>>(columns: &[S], rule: MatchRule) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, column)| rule.matches(column.as_ref()))
        .map(|(index, _)| index)
        .collect()
}

/// Finds the column for `role` within a table of the given kind.
///
/// Returns `None` when nothing matches; the caller decides whether that is fatal.
pub fn resolve<S: AsRef<str>>(
    columns: &[S],
    table: TableKind,
    role: ColumnRole,
) -> Option<ResolvedColumn> {
    let matches = candidates(columns, role.rule_for(table));
    let index = *matches.first()?;
    if matches.len() > 1 {
        let names: Vec<&str> = matches.iter().map(|idx| columns[*idx].as_ref()).collect();
        warn!(
            %table,
            %role,
            chosen = columns[index].as_ref(),
            ?names,
            "several columns match; using the first"
        );
    }
    Some(ResolvedColumn {
        index,
        name: columns[index].as_ref().to_string(),
    })
}

/// Like [`resolve`], but a missing column aborts the run.
pub fn require<S: AsRef<str>>(
    columns: &[S],
    table: TableKind,
    role: ColumnRole,
) -> Result<ResolvedColumn> {
    resolve(columns, table, role).ok_or(ReportError::ColumnNotFound { table, role })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_matches_case_insensitive_substring() {
        let columns = ["SKU", "(Child) ASIN", "Title"];
        let resolved = resolve(&columns, TableKind::BusinessReport, ColumnRole::Identifier)
            .expect("asin column");
        assert_eq!(resolved.index, 1);
        assert_eq!(resolved.name, "(Child) ASIN");
    }

    #[test]
    fn first_matching_column_wins() {
        let columns = ["Parent ASIN", "Child ASIN"];
        let resolved = resolve(&columns, TableKind::BusinessReport, ColumnRole::Identifier)
            .expect("asin column");
        assert_eq!(resolved.name, "Parent ASIN");
        assert_eq!(candidates(&columns, ColumnRole::Identifier.rule()), vec![0, 1]);
    }

    #[test]
    fn quantity_sold_accepts_either_keyword() {
        let total = ["asin", "Total Order Items"];
        let plain = ["asin", "Units Ordered", "Order Items - B2B"];
        assert_eq!(
            resolve(&total, TableKind::BusinessReport, ColumnRole::QuantitySold)
                .map(|c| c.index),
            Some(1)
        );
        assert_eq!(
            resolve(&plain, TableKind::BusinessReport, ColumnRole::QuantitySold)
                .map(|c| c.index),
            Some(2)
        );
    }

    #[test]
    fn cost_price_requires_whole_header() {
        let columns = ["CPU", "Recipe", " cp", "CP"];
        let resolved = resolve(&columns, TableKind::ProductMaster, ColumnRole::CatalogCostPrice)
            .expect("cp column");
        assert_eq!(resolved.index, 3);
    }

    #[test]
    fn brand_is_exact_but_case_insensitive() {
        let columns = ["Brand Manager", "BRAND"];
        assert_eq!(
            resolve(&columns, TableKind::ProductMaster, ColumnRole::CatalogBrand)
                .map(|c| c.index),
            Some(1)
        );
        assert_eq!(
            resolve(&columns, TableKind::ProductMaster, ColumnRole::CatalogManager)
                .map(|c| c.index),
            Some(0)
        );
    }

    #[test]
    fn product_name_and_vendor_sku_need_all_keywords() {
        let columns = ["Product", "Vendor", "Product Name", "Vendor SKU"];
        assert_eq!(
            resolve(&columns, TableKind::ProductMaster, ColumnRole::CatalogProductName)
                .map(|c| c.index),
            Some(2)
        );
        assert_eq!(
            resolve(&columns, TableKind::ProductMaster, ColumnRole::CatalogVendorSku)
                .map(|c| c.index),
            Some(3)
        );
    }

    #[test]
    fn inventory_headers_are_case_sensitive() {
        let columns = ["ASIN", "sellable"];
        assert!(resolve(&columns, TableKind::Inventory, ColumnRole::Identifier).is_none());
        assert!(resolve(&columns, TableKind::Inventory, ColumnRole::QuantityOnHand).is_none());
    }

    #[test]
    fn require_reports_role_and_table() {
        let columns = ["asin", "title"];
        let error = require(&columns, TableKind::Fulfillment, ColumnRole::Status)
            .expect_err("no status column");
        match error {
            ReportError::ColumnNotFound { table, role } => {
                assert_eq!(table, TableKind::Fulfillment);
                assert_eq!(role, ColumnRole::Status);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
