use std::collections::BTreeMap;

use crate::qwtt::report::model::{AggregateRow, AggregateTable, RawTable};
use crate::qwtt::report::numeric::normalize_quantity;

/// Groups `(identifier, raw value)` pairs and sums the cleaned quantities.
///
/// Identifiers are compared exactly as written (no trimming); rows with a blank
/// identifier are ignored. Groups come out ordered by identifier.
pub fn aggregate<'a, I>(pairs: I) -> AggregateTable
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut groups: BTreeMap<&'a str, i64> = BTreeMap::new();

    for (identifier, raw) in pairs {
        if identifier.trim().is_empty() {
            continue;
        }
        let total = groups.entry(identifier).or_insert(0);
        *total = total.saturating_add(normalize_quantity(raw));
    }

    let rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(identifier, value)| AggregateRow {
            identifier: identifier.to_string(),
            value,
        })
        .collect();
    let grand_total = saturating_total(rows.iter().map(|row| row.value));

    AggregateTable { rows, grand_total }
}

/// Sums quantities, clamping at the `i64` bounds instead of overflowing.
pub fn saturating_total<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// Aggregates one value column of a table by its identifier column.
pub fn aggregate_column(table: &RawTable, identifier: usize, value: usize) -> AggregateTable {
    aggregate(table.pairs(identifier, value))
}
