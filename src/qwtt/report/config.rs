use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::qwtt::report::error::Result;

/// Label carried by the synthetic total row in both reports.
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// Tunables for a report-generation run. Every field has a default so a
/// partial JSON document is enough to override a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Identifier written into the grand-total row.
    pub grand_total_label: String,
    /// Fulfillment statuses (compared trimmed and lower-cased) that are dropped.
    pub excluded_statuses: Vec<String>,
    /// Decimal places for the weighted cost price on the grand-total row.
    pub cost_price_decimals: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            grand_total_label: GRAND_TOTAL_LABEL.to_string(),
            excluded_statuses: vec!["cancelled".to_string(), "sidelined".to_string()],
            cost_price_decimals: 2,
        }
    }
}

impl ReportConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub(crate) fn is_excluded_status(&self, normalized: &str) -> bool {
        self.excluded_statuses
            .iter()
            .any(|status| status.trim().to_lowercase() == normalized)
    }
}
