//! Cleaning of locale-formatted numeric text.
//!
//! Exports render numbers as `₹1,234.50`, `$ 99` or blank cells. Only thousands
//! separators, currency symbols and whitespace are removed; anything else is
//! left in place and makes the value non-numeric, which degrades to zero.

use std::sync::LazyLock;

use regex::Regex;

static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,₹$\s]").expect("Invalid numeric noise regex"));

/// Parses a monetary or quantity cell at full precision.
///
/// Never fails: empty, malformed, or non-finite text yields `0.0`.
pub fn normalize(raw: &str) -> f64 {
    let cleaned = NOISE.replace_all(raw, "");
    let cleaned = if cleaned.is_empty() { "0" } else { &*cleaned };
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parses a quantity cell and truncates it toward zero.
pub fn normalize_quantity(raw: &str) -> i64 {
    normalize(raw).trunc() as i64
}

/// Most decimal places an `f64` can meaningfully carry.
const MAX_DECIMALS: u32 = 15;

/// Rounds half away from zero to `decimals` places (at most 15).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}
