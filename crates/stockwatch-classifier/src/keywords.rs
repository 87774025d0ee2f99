//! Phrase-based availability tiers: per-domain rules, then generic phrases.
//!
//! Within a tier negatives are always checked before positives, so a page
//! that says both "add to cart" and "out of stock" is out of stock here.

use stockwatch_core::{AvailabilityState, DomainRuleTable};

pub const GENERIC_NEGATIVES: [&str; 6] = [
    "out of stock",
    "sold out",
    "currently unavailable",
    "temporarily unavailable",
    "no longer available",
    "not available online",
];

pub const GENERIC_POSITIVES: [&str; 5] = [
    "add to cart",
    "add to basket",
    "buy now",
    "in stock",
    "available online",
];

pub const BLOCKED_INDICATORS: [&str; 2] = ["captcha", "robot check"];

/// The phrase that decided a keyword tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub state: AvailabilityState,
    pub phrase: String,
}

/// Applies the rule set registered for `host`, if any.
///
/// `text` must be normalized (see [`crate::text::visible_text`]).
#[must_use]
pub fn domain_availability(
    table: &DomainRuleTable,
    host: Option<&str>,
    text: &str,
) -> Option<KeywordMatch> {
    let (domain, rules) = table.lookup(host?)?;

    let found = if let Some(phrase) = rules.matching_negative(text) {
        KeywordMatch {
            state: AvailabilityState::OutOfStock,
            phrase: phrase.to_string(),
        }
    } else {
        let phrase = rules.matching_positive(text)?;
        KeywordMatch {
            state: AvailabilityState::Available,
            phrase: phrase.to_string(),
        }
    };

    tracing::trace!(domain, phrase = %found.phrase, "domain rule matched");
    Some(found)
}

/// Site-agnostic phrases: negatives, then positives, then blocking indicators.
#[must_use]
pub fn generic_availability(text: &str) -> Option<KeywordMatch> {
    let tiers = [
        (&GENERIC_NEGATIVES[..], AvailabilityState::OutOfStock),
        (&GENERIC_POSITIVES[..], AvailabilityState::Available),
        (&BLOCKED_INDICATORS[..], AvailabilityState::Blocked),
    ];

    tiers.iter().find_map(|(phrases, state)| {
        phrases
            .iter()
            .find(|phrase| text.contains(*phrase))
            .map(|phrase| KeywordMatch {
                state: *state,
                phrase: (*phrase).to_string(),
            })
    })
}

/// Blocking indicators only. Used on text outside the body, such as the
/// page title, where stock phrases are not trusted.
#[must_use]
pub fn blocked_indicator(text: &str) -> Option<KeywordMatch> {
    BLOCKED_INDICATORS
        .iter()
        .find(|phrase| text.contains(*phrase))
        .map(|phrase| KeywordMatch {
            state: AvailabilityState::Blocked,
            phrase: (*phrase).to_string(),
        })
}
