use stockwatch_core::DomainRuleSet;

use super::*;

fn product_page(head: &str, body: &str) -> String {
    format!("<!doctype html><html><head>{head}</head><body>{body}</body></html>")
}

fn jsonld(json: &str) -> String {
    format!(r#"<script type="application/ld+json">{json}</script>"#)
}

const SHOP_URL: &str = "https://shop.example.com/products/widget";

// -----------------------------------------------------------------------
// Structured-data tier
// -----------------------------------------------------------------------

#[test]
fn structured_in_stock_beats_body_text() {
    let html = product_page(
        &jsonld(r#"{"@type": "Product", "offers": {"availability": "http://schema.org/INSTOCK"}}"#),
        "<p>Out of stock</p><button disabled>Add to cart</button>",
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Available);
    assert_eq!(result.tier, Tier::StructuredData);
}

#[test]
fn structured_out_of_stock() {
    let html = product_page(
        &jsonld(r#"{"offers": [{"availability": "https://schema.org/OutOfStock"}]}"#),
        "<button>Add to cart</button>",
    );
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::OutOfStock
    );
}

#[test]
fn structured_preorder() {
    let html = product_page(
        &jsonld(r#"{"offers": {"availability": "https://schema.org/PreOrder"}}"#),
        "",
    );
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::Preorder
    );
}

#[test]
fn structured_discontinued_maps_through_in_substring() {
    let html = product_page(
        &jsonld(r#"{"offers": {"availability": "https://schema.org/Discontinued"}}"#),
        "",
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Available);
    assert_eq!(result.tier, Tier::StructuredData);
}

#[test]
fn microdata_availability_is_structured_tier() {
    let html = product_page(
        "",
        r#"<link itemprop="availability" href="https://schema.org/OutOfStock">
           <button>Add to cart</button>"#,
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::OutOfStock);
    assert_eq!(result.tier, Tier::StructuredData);
}

#[test]
fn unrecognized_structured_availability_falls_through() {
    let html = product_page(
        &jsonld(r#"{"offers": {"availability": "https://schema.org/LimitedAvailability"}}"#),
        "<button>Buy now</button>",
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Available);
    assert_eq!(result.tier, Tier::Button);
}

// -----------------------------------------------------------------------
// Button tier
// -----------------------------------------------------------------------

#[test]
fn enabled_add_to_cart_is_available() {
    let html = product_page("", "<button>Add to Cart</button>");
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::Available
    );
}

#[test]
fn disabled_add_to_cart_is_out_of_stock() {
    let html = product_page("", "<button disabled=\"disabled\">Add to Cart</button>");
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::OutOfStock
    );
}

#[test]
fn enabled_button_beats_out_of_stock_text() {
    let html = product_page(
        "",
        "<p>Other sizes are out of stock</p><button>Add to cart</button>",
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Available);
    assert_eq!(result.tier, Tier::Button);
}

// -----------------------------------------------------------------------
// Keyword tiers
// -----------------------------------------------------------------------

#[test]
fn ebgames_preorder_text_is_out_of_stock_not_preorder() {
    let html = product_page("", "<div class=\"badge\">Pre-Order</div><p>Ships in May</p>");
    let result = Classifier::default().classify(&html, "https://www.ebgames.ca/Switch/Games/12345");
    assert_eq!(result.availability, AvailabilityState::OutOfStock);
    assert_eq!(result.tier, Tier::DomainRules);
}

#[test]
fn domain_negatives_are_checked_before_positives() {
    let html = product_page(
        "",
        "<p>Add to cart</p><p>Online availability: Out of stock</p>",
    );
    assert_eq!(
        classify_availability(&html, "https://ebgames.ca/p/1"),
        AvailabilityState::OutOfStock
    );
}

#[test]
fn domain_positive_wins_when_no_negative() {
    let html = product_page("", "<p>Pick up today at a store near you</p>");
    let result = Classifier::default().classify(&html, "https://www.ebgames.ca/p/1");
    assert_eq!(result.availability, AvailabilityState::Available);
    assert_eq!(result.tier, Tier::DomainRules);
}

#[test]
fn unmatched_domain_falls_through_to_generic() {
    let html = product_page("", "<p>Sold out</p>");
    let result = Classifier::default().classify(&html, "https://www.amazon.ca/dp/B0000");
    assert_eq!(result.availability, AvailabilityState::OutOfStock);
    assert_eq!(result.tier, Tier::GenericRules);
}

#[test]
fn generic_negative_beats_generic_positive_text() {
    let html = product_page("", "<p>Add to cart</p><p>Out of stock</p>");
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::OutOfStock
    );
}

#[test]
fn captcha_page_is_blocked() {
    let html = product_page("", "<h1>Please complete this CAPTCHA</h1>");
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Blocked);
    assert_eq!(result.tier, Tier::GenericRules);
    assert_eq!(result.price, None);
}

#[test]
fn robot_check_title_alone_is_blocked() {
    let html = product_page(
        "<title>Robot Check</title>",
        "<p>Type the characters you see in this image.</p>",
    );
    let result = Classifier::default().classify(&html, "https://www.example.com/dp/B0001");
    assert_eq!(result.availability, AvailabilityState::Blocked);
    assert_eq!(result.tier, Tier::GenericRules);
}

#[test]
fn body_stock_text_beats_blocked_title() {
    let html = product_page("<title>Robot Check</title>", "<p>In stock</p>");
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::Available
    );
}

#[test]
fn script_text_does_not_feed_keyword_tiers() {
    let html = product_page(
        "<script>window.msg = 'Sold out';</script>",
        "<p>A product</p>",
    );
    assert_eq!(
        classify_availability(&html, SHOP_URL),
        AvailabilityState::Unknown
    );
}

#[test]
fn custom_rule_table_is_used() {
    let rules = DomainRuleTable::from_entries([(
        "shop.example.com",
        DomainRuleSet::new(["ready to ship"], ["join the waitlist"]),
    )]);
    let classifier = Classifier::new(Arc::new(rules));
    let html = product_page("", "<p>Join the waitlist</p>");
    let result = classifier.classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::OutOfStock);
    assert_eq!(result.tier, Tier::DomainRules);
}

#[test]
fn empty_page_is_unknown_without_price() {
    let result = Classifier::default().classify("", SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::Unknown);
    assert_eq!(result.tier, Tier::Default);
    assert_eq!(result.price, None);
    assert_eq!(extract_price(""), None);
}

#[test]
fn unparseable_url_still_classifies_generically() {
    let html = product_page("", "<p>In stock</p>");
    assert_eq!(
        classify_availability(&html, "not a url"),
        AvailabilityState::Available
    );
}

// -----------------------------------------------------------------------
// Price
// -----------------------------------------------------------------------

#[test]
fn regex_price_with_thousands() {
    let html = product_page("", "<span class=\"price\">$1,234.56</span>");
    assert_eq!(extract_price(&html), Some(1234.56));
}

#[test]
fn regex_price_with_cad_marker() {
    let html = product_page("", "<span>CAD $19.99</span>");
    assert_eq!(extract_price(&html), Some(19.99));
}

#[test]
fn no_currency_marker_means_no_price() {
    let html = product_page("", "<span>19.99</span>");
    assert_eq!(extract_price(&html), None);
}

#[test]
fn structured_price_preferred_over_regex() {
    let html = product_page(
        &jsonld(r#"{"@type": "Product", "offers": {"price": "49.99", "priceCurrency": "USD"}}"#),
        "<p>Accessories from $9.99</p>",
    );
    assert_eq!(extract_price(&html), Some(49.99));
}

#[test]
fn unparseable_structured_price_falls_back_to_regex() {
    let html = product_page(
        &jsonld(r#"{"offers": {"price": "Call us"}}"#),
        "<p>Now $15.00</p>",
    );
    assert_eq!(extract_price(&html), Some(15.0));
}

#[test]
fn price_is_extracted_for_out_of_stock_page() {
    let html = product_page(
        &jsonld(r#"{"offers": {"price": 299, "availability": "OutOfStock"}}"#),
        "",
    );
    let result = Classifier::default().classify(&html, SHOP_URL);
    assert_eq!(result.availability, AvailabilityState::OutOfStock);
    assert_eq!(result.price, Some(299.0));
}

#[test]
fn classify_agrees_with_separate_operations() {
    let html = product_page(
        &jsonld(r#"{"offers": {"lowPrice": "10.00"}}"#),
        "<a href=\"/cart\">Buy now</a>",
    );
    let classifier = Classifier::default();
    let combined = classifier.classify(&html, SHOP_URL);
    assert_eq!(
        combined.availability,
        classifier.classify_availability(&html, SHOP_URL)
    );
    assert_eq!(combined.price, classifier.extract_price(&html));
}

// -----------------------------------------------------------------------
// Label re-mapping
// -----------------------------------------------------------------------

#[test]
fn map_structured_label_checks_substrings_in_order() {
    assert_eq!(
        map_structured_label("Out of stock"),
        Some(AvailabilityState::OutOfStock)
    );
    assert_eq!(
        map_structured_label("In stock"),
        Some(AvailabilityState::Available)
    );
    assert_eq!(
        map_structured_label("Preorder"),
        Some(AvailabilityState::Preorder)
    );
    assert_eq!(
        map_structured_label("Discontinued"),
        Some(AvailabilityState::Available)
    );
    assert_eq!(map_structured_label("dISCONT"), Some(AvailabilityState::Discontinued));
    assert_eq!(
        map_structured_label("Online only"),
        Some(AvailabilityState::Available)
    );
    assert_eq!(map_structured_label("???"), None);
}
