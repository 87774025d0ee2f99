//! Free-text price scanning and decimal parsing.

use std::sync::LazyLock;

use regex::Regex;

/// Optional `$` or `CAD` (optionally followed by `$`) marker, then a number
/// with optional comma/space thousands groups and an optional two-digit
/// fraction.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\$|CAD\s*\$?)\s*([0-9]{1,3}(?:[, ][0-9]{3})*(?:\.[0-9]{2})?)")
        .expect("valid price regex")
});

/// Scans raw HTML for the first currency-marked amount.
///
/// Returns `None` when no marked amount is present; that is not an error.
#[must_use]
pub fn extract_price_from_text(html: &str) -> Option<f32> {
    let amount = PRICE_RE.captures(html)?.get(1)?.as_str();
    let digits: String = amount.chars().filter(|c| *c != ',' && *c != ' ').collect();
    parse_decimal(&digits)
}

/// Parses a structured-data price string: strips `,` separators and
/// surrounding whitespace, then parses a finite decimal.
#[must_use]
pub fn parse_price_text(raw: &str) -> Option<f32> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    parse_decimal(cleaned.trim())
}

fn parse_decimal(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}
