//! Text normalization helpers shared by the keyword and button tiers.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use stockwatch_core::rules::normalize_host;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// Elements whose text content is never shown to a shopper.
const HIDDEN_CONTAINERS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Collapses all whitespace runs to single spaces, trims, and lower-cases.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized text of an element and its descendants.
#[must_use]
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Visible body text with markup stripped, whitespace collapsed, lower-cased.
///
/// Text inside `script`, `style`, `noscript`, and `template` is excluded, so
/// embedded linked data never leaks into keyword matching.
#[must_use]
pub fn visible_text(html: &Html) -> String {
    let root = html
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| html.root_element());

    let mut raw = String::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_CONTAINERS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }

    normalize_whitespace(&raw)
}

/// Normalized `<title>` text, empty when the document has none.
#[must_use]
pub fn page_title(html: &Html) -> String {
    html.select(&TITLE_SELECTOR)
        .next()
        .map(|title| element_text(&title))
        .unwrap_or_default()
}

/// Lower-cased host of `url` with scheme, port, and credentials removed.
///
/// Scheme-less input such as `"ebgames.ca/product/123"` is accepted.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let parsed = url::Url::parse(trimmed)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| url::Url::parse(&format!("https://{trimmed}")).ok())?;
    parsed
        .host_str()
        .map(normalize_host)
        .filter(|host| !host.is_empty())
}
