use tracing::debug;

use crate::qwtt::report::columns::{ColumnRole, ResolvedColumn, require};
use crate::qwtt::report::config::ReportConfig;
use crate::qwtt::report::error::Result;
use crate::qwtt::report::model::{RawTable, TableKind};
use crate::qwtt::report::numeric::normalize;

/// Column positions the fulfillment export must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentColumns {
    pub identifier: ResolvedColumn,
    pub status: ResolvedColumn,
    pub order_value: ResolvedColumn,
    pub units: ResolvedColumn,
}

impl FulfillmentColumns {
    pub fn resolve(table: &RawTable) -> Result<Self> {
        let kind = TableKind::Fulfillment;
        Ok(Self {
            identifier: require(&table.columns, kind, ColumnRole::Identifier)?,
            status: require(&table.columns, kind, ColumnRole::Status)?,
            order_value: require(&table.columns, kind, ColumnRole::MonetaryValue)?,
            units: require(&table.columns, kind, ColumnRole::Units)?,
        })
    }
}

/// Drops cancelled/sidelined orders and orders without a positive value.
///
/// Retained rows carry their status cell trimmed and lower-cased. Both rules
/// are applied to every row before anything is aggregated, so a row is either
/// kept once or not at all.
pub fn filter_fulfillment(
    table: &RawTable,
    columns: &FulfillmentColumns,
    config: &ReportConfig,
) -> RawTable {
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut excluded_status = 0usize;
    let mut excluded_value = 0usize;

    for row in &table.rows {
        let status = RawTable::cell(row, columns.status.index)
            .trim()
            .to_lowercase();
        if config.is_excluded_status(&status) {
            excluded_status += 1;
            continue;
        }
        if normalize(RawTable::cell(row, columns.order_value.index)) <= 0.0 {
            excluded_value += 1;
            continue;
        }

        let mut kept = row.clone();
        if let Some(cell) = kept.get_mut(columns.status.index) {
            *cell = status;
        }
        rows.push(kept);
    }

    debug!(
        retained = rows.len(),
        excluded_status, excluded_value, "filtered fulfillment orders"
    );

    RawTable::new(table.kind, table.columns.clone(), rows)
}
