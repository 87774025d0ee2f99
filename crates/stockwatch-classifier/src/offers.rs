//! Offer projection over linked-data nodes.

use serde_json::{Map, Value};

const OFFER_KEYS: [&str; 2] = ["offers", "offer"];
const AVAILABILITY_KEYS: [&str; 2] = ["availability", "itemAvailability"];
const PRICE_KEYS: [&str; 3] = ["price", "lowPrice", "highPrice"];

/// A read-only view of one offer-like JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Offer<'a> {
    node: &'a Map<String, Value>,
}

impl<'a> Offer<'a> {
    #[must_use]
    pub fn new(node: &'a Map<String, Value>) -> Self {
        Self { node }
    }

    /// The first non-empty `availability` / `itemAvailability` value.
    ///
    /// Accepts plain strings and `{"@id": "..."}` references.
    #[must_use]
    pub fn availability(&self) -> Option<&'a str> {
        AVAILABILITY_KEYS
            .iter()
            .filter_map(|key| self.node.get(*key))
            .filter_map(|value| match value {
                Value::String(s) => Some(s.as_str()),
                Value::Object(map) => map.get("@id").and_then(Value::as_str),
                _ => None,
            })
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// The first present, non-null, non-empty of `price`, `lowPrice`, `highPrice`.
    #[must_use]
    pub fn price_value(&self) -> Option<&'a Value> {
        PRICE_KEYS
            .iter()
            .filter_map(|key| self.node.get(*key))
            .find(|value| is_truthy(value))
    }
}

/// `true` if `node` carries an offer, availability, or price key from `keys`.
#[must_use]
pub fn has_any_key(node: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| node.contains_key(*key))
}

/// Normalizes a node to its offer-like objects.
///
/// Uses the value of `offers` (else `offer`) when present, wrapping a single
/// object as a one-element list; otherwise the node itself is the offer.
/// Non-object entries inside an offers list are dropped.
#[must_use]
pub fn offer_candidates(node: &Map<String, Value>) -> Vec<Offer<'_>> {
    let nested = OFFER_KEYS
        .iter()
        .filter_map(|key| node.get(*key))
        .find(|value| is_truthy(value));

    match nested {
        None => vec![Offer::new(node)],
        Some(Value::Object(map)) => vec![Offer::new(map)],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(Offer::new)
            .collect(),
        Some(_) => Vec::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().expect("object")
    }

    #[test]
    fn node_without_offers_is_its_own_offer() {
        let node = json!({"price": "10.00", "availability": "InStock"});
        let offers = offer_candidates(object(&node));
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].availability(), Some("InStock"));
    }

    #[test]
    fn single_offer_object_is_wrapped() {
        let node = json!({"offers": {"availability": "OutOfStock"}});
        let offers = offer_candidates(object(&node));
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].availability(), Some("OutOfStock"));
    }

    #[test]
    fn offer_key_is_used_when_offers_missing() {
        let node = json!({"offer": [{"price": 5}, {"price": 6}]});
        assert_eq!(offer_candidates(object(&node)).len(), 2);
    }

    #[test]
    fn empty_offers_list_falls_back_to_node() {
        let node = json!({"offers": [], "availability": "PreOrder"});
        let offers = offer_candidates(object(&node));
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].availability(), Some("PreOrder"));
    }

    #[test]
    fn scalar_offers_yield_no_candidates() {
        let node = json!({"offers": "https://example.com/offer"});
        assert!(offer_candidates(object(&node)).is_empty());
    }

    #[test]
    fn availability_skips_empty_and_reads_item_availability() {
        let node = json!({"availability": "  ", "itemAvailability": "Discontinued"});
        assert_eq!(Offer::new(object(&node)).availability(), Some("Discontinued"));
    }

    #[test]
    fn availability_accepts_id_reference() {
        let node = json!({"availability": {"@id": "https://schema.org/InStock"}});
        assert_eq!(
            Offer::new(object(&node)).availability(),
            Some("https://schema.org/InStock")
        );
    }

    #[test]
    fn price_value_falls_back_through_low_and_high() {
        let node = json!({"price": null, "lowPrice": "", "highPrice": "99"});
        assert_eq!(Offer::new(object(&node)).price_value(), Some(&json!("99")));
    }

    #[test]
    fn has_any_key_checks_membership() {
        let node = json!({"lowPrice": 1});
        assert!(has_any_key(object(&node), &["price", "lowPrice"]));
        assert!(!has_any_key(object(&node), &["offers"]));
    }
}
