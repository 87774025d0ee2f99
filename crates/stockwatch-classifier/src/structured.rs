//! Availability and price from structured metadata (JSON-LD, then microdata).

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::jsonld::JsonLdDocuments;
use crate::offers::{has_any_key, offer_candidates};
use crate::price::parse_price_text;

pub const LABEL_IN_STOCK: &str = "In stock";
pub const LABEL_OUT_OF_STOCK: &str = "Out of stock";
pub const LABEL_PREORDER: &str = "Preorder";
pub const LABEL_DISCONTINUED: &str = "Discontinued";

const AVAILABILITY_TRIGGERS: [&str; 4] = ["offers", "offer", "availability", "itemAvailability"];
const PRICE_TRIGGERS: [&str; 5] = ["offers", "offer", "price", "lowPrice", "highPrice"];

static MICRODATA_AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[itemprop="availability"]"#).expect("valid microdata selector")
});

/// Resolves an availability label from linked data, falling back to a
/// microdata `itemprop="availability"` element.
///
/// Returns the first match in walk order: first node, first offer, first
/// rule. There is no aggregation across offers.
#[must_use]
pub fn structured_availability(docs: &JsonLdDocuments, html: &Html) -> Option<&'static str> {
    jsonld_availability(docs).or_else(|| microdata_availability(html))
}

fn jsonld_availability(docs: &JsonLdDocuments) -> Option<&'static str> {
    docs.nodes()
        .filter(|node| has_any_key(node, &AVAILABILITY_TRIGGERS))
        .flat_map(offer_candidates)
        .filter_map(|offer| offer.availability())
        .find_map(availability_label)
}

/// Maps a schema.org-style availability value to a label.
///
/// Rules apply in a fixed order, so a value mentioning both `instock` and
/// `outofstock` resolves to in-stock.
#[must_use]
pub fn availability_label(raw: &str) -> Option<&'static str> {
    let lower = raw.to_lowercase();
    if lower.contains("instock") {
        Some(LABEL_IN_STOCK)
    } else if lower.contains("outofstock") || lower.contains("out_of_stock") {
        Some(LABEL_OUT_OF_STOCK)
    } else if lower.contains("preorder") || lower.contains("pre order") {
        Some(LABEL_PREORDER)
    } else if lower.contains("discontinued") {
        Some(LABEL_DISCONTINUED)
    } else {
        None
    }
}

fn microdata_availability(html: &Html) -> Option<&'static str> {
    let element = html.select(&MICRODATA_AVAILABILITY).next()?;
    let target = element
        .value()
        .attr("href")
        .or_else(|| element.value().attr("content"))?
        .to_lowercase();

    if target.contains("instock") {
        Some(LABEL_IN_STOCK)
    } else if target.contains("outofstock") {
        Some(LABEL_OUT_OF_STOCK)
    } else {
        None
    }
}

/// Returns the first price in linked data that parses as a decimal.
///
/// Each offer contributes `price`, else `lowPrice`, else `highPrice`. An
/// unparseable candidate is skipped and the walk continues.
#[must_use]
pub fn structured_price(docs: &JsonLdDocuments) -> Option<f32> {
    docs.nodes()
        .filter(|node| has_any_key(node, &PRICE_TRIGGERS))
        .flat_map(offer_candidates)
        .filter_map(|offer| offer.price_value())
        .find_map(|value| {
            let parsed = price_from_value(value);
            if parsed.is_none() {
                tracing::debug!(candidate = %value, "skipping unparseable structured price");
            }
            parsed
        })
}

#[allow(clippy::cast_possible_truncation)]
fn price_from_value(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32).filter(|v| v.is_finite()),
        Value::String(s) => parse_price_text(s),
        _ => None,
    }
}
