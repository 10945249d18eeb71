use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::qwtt::report::aggregate::aggregate_column;
use crate::qwtt::report::assemble::{build_cost_report, build_stock_report, summarize};
use crate::qwtt::report::catalog::{CatalogIndex, QuantityIndex};
use crate::qwtt::report::columns::{ColumnRole, require};
use crate::qwtt::report::config::ReportConfig;
use crate::qwtt::report::error::{ReportError, Result};
use crate::qwtt::report::filter::{FulfillmentColumns, filter_fulfillment};
use crate::qwtt::report::model::{CostReport, RawTable, ReportSummary, StockReport, TableKind};

/// Raw tables handed over by the caller. The fulfillment export is optional;
/// the other three are required.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub inventory: Option<RawTable>,
    pub business_report: Option<RawTable>,
    pub product_master: Option<RawTable>,
    pub fulfillment: Option<RawTable>,
}

/// Output of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reports {
    pub run_id: Uuid,
    pub stock: StockReport,
    pub cost: CostReport,
    pub summary: ReportSummary,
}

/// Runs the full pipeline: column resolution, cleaning, fulfillment filtering,
/// aggregation, and report assembly.
///
/// Any missing table or unresolved required column aborts the run before a
/// report is produced.
#[instrument(level = "info", skip_all)]
pub fn generate_reports(inputs: &ReportInputs, config: &ReportConfig) -> Result<Reports> {
    let inventory = required(inputs.inventory.as_ref(), TableKind::Inventory)?;
    let business = required(inputs.business_report.as_ref(), TableKind::BusinessReport)?;
    let product_master = required(inputs.product_master.as_ref(), TableKind::ProductMaster)?;

    let inv_asin = require(&inventory.columns, TableKind::Inventory, ColumnRole::Identifier)?;
    let inv_sellable = require(
        &inventory.columns,
        TableKind::Inventory,
        ColumnRole::QuantityOnHand,
    )?;
    let biz_asin = require(
        &business.columns,
        TableKind::BusinessReport,
        ColumnRole::Identifier,
    )?;
    let biz_items = require(
        &business.columns,
        TableKind::BusinessReport,
        ColumnRole::QuantitySold,
    )?;
    debug!(
        business_asin = %biz_asin.name,
        business_items = %biz_items.name,
        "resolved business report columns"
    );
    let fulfillment_columns = inputs
        .fulfillment
        .as_ref()
        .map(|table| FulfillmentColumns::resolve(table).map(|columns| (table, columns)))
        .transpose()?;
    let catalog = CatalogIndex::from_table(product_master)?;

    let stock = aggregate_column(inventory, inv_asin.index, inv_sellable.index);
    info!(
        products = stock.len(),
        total_stock = stock.grand_total,
        "aggregated inventory"
    );

    let sales = QuantityIndex::from_aggregate(&aggregate_column(
        business,
        biz_asin.index,
        biz_items.index,
    ));
    info!(products = sales.len(), "indexed business report sales");

    let units = match fulfillment_columns {
        Some((table, columns)) => {
            let retained = filter_fulfillment(table, &columns, config);
            let aggregated =
                aggregate_column(&retained, columns.identifier.index, columns.units.index);
            info!(
                orders = table.rows.len(),
                retained = retained.rows.len(),
                total_units = aggregated.grand_total,
                "aggregated fulfillment units"
            );
            QuantityIndex::from_aggregate(&aggregated)
        }
        None => {
            debug!("no fulfillment export supplied; units default to zero");
            QuantityIndex::default()
        }
    };

    let stock_report = build_stock_report(&stock, &sales, &catalog, config);
    let cost_report = build_cost_report(&stock, &units, &catalog, config);
    let summary = summarize(&stock_report);
    let run_id = Uuid::new_v4();
    info!(
        %run_id,
        products = summary.product_count,
        total_sales = summary.total_sales,
        "reports generated"
    );

    Ok(Reports {
        run_id,
        stock: stock_report,
        cost: cost_report,
        summary,
    })
}

fn required(table: Option<&RawTable>, kind: TableKind) -> Result<&RawTable> {
    table.ok_or(ReportError::MissingTable(kind))
}

/// Keeps the most recent successful reports for re-display and re-download.
#[derive(Debug, Default)]
pub struct ReportCache {
    last: Option<Reports>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the pipeline and replaces the cached reports only on success.
    /// A failed run leaves the previous reports in place.
    pub fn refresh(&mut self, inputs: &ReportInputs, config: &ReportConfig) -> Result<&Reports> {
        let reports = generate_reports(inputs, config)?;
        Ok(self.last.insert(reports))
    }

    pub fn last(&self) -> Option<&Reports> {
        self.last.as_ref()
    }

    pub fn stock_report(&self) -> Option<&StockReport> {
        self.last.as_ref().map(|reports| &reports.stock)
    }

    pub fn cost_report(&self) -> Option<&CostReport> {
        self.last.as_ref().map(|reports| &reports.cost)
    }
}
