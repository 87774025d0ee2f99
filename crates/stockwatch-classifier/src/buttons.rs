//! Purchase-control semantics: "add to cart" / "buy now" and their disabled state.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use stockwatch_core::AvailabilityState;

use crate::text::element_text;

static CONTROL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button, a").expect("valid control selector"));

const PURCHASE_PHRASES: [&str; 2] = ["add to cart", "buy now"];

/// Inspects the first purchase control in document order.
///
/// An enabled control means [`AvailabilityState::Available`], a disabled one
/// [`AvailabilityState::OutOfStock`]. Scanning stops at the first control
/// whose text mentions a purchase phrase, even if later controls disagree.
#[must_use]
pub fn button_availability(html: &Html) -> Option<AvailabilityState> {
    html.select(&CONTROL_SELECTOR)
        .find(|control| {
            let text = element_text(control);
            !text.is_empty() && PURCHASE_PHRASES.iter().any(|p| text.contains(p))
        })
        .map(|control| {
            if is_disabled(&control) {
                AvailabilityState::OutOfStock
            } else {
                AvailabilityState::Available
            }
        })
}

fn is_disabled(control: &ElementRef<'_>) -> bool {
    let element = control.value();
    element.attr("disabled").is_some()
        || element
            .attr("aria-disabled")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
