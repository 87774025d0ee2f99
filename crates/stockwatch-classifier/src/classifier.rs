//! The availability waterfall and independent price resolution.

use std::sync::{Arc, LazyLock};

use scraper::Html;
use serde::Serialize;
use stockwatch_core::{AvailabilityState, DomainRuleTable};

use crate::buttons::button_availability;
use crate::jsonld::JsonLdDocuments;
use crate::keywords::{blocked_indicator, domain_availability, generic_availability};
use crate::price::extract_price_from_text;
use crate::structured::{structured_availability, structured_price};
use crate::text::{host_of, page_title, visible_text};

static DEFAULT_CLASSIFIER: LazyLock<Classifier> =
    LazyLock::new(|| Classifier::new(Arc::new(DomainRuleTable::builtin().clone())));

/// Which stage of the availability waterfall produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    StructuredData,
    Button,
    DomainRules,
    GenericRules,
    Default,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::StructuredData => "structured_data",
            Tier::Button => "button",
            Tier::DomainRules => "domain_rules",
            Tier::GenericRules => "generic_rules",
            Tier::Default => "default",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub availability: AvailabilityState,
    pub price: Option<f32>,
    pub tier: Tier,
}

/// Stateless classifier over a shared, immutable [`DomainRuleTable`].
///
/// Cheap to clone; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Arc<DomainRuleTable>,
}

impl Default for Classifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

impl Classifier {
    #[must_use]
    pub fn new(rules: Arc<DomainRuleTable>) -> Self {
        Self { rules }
    }

    /// Classifies availability and extracts the price, parsing the page once.
    #[must_use]
    pub fn classify(&self, html: &str, url: &str) -> Classification {
        let document = Html::parse_document(html);
        let docs = JsonLdDocuments::from_html(&document);

        let (availability, tier) = self.resolve_availability(&document, &docs, url);
        let price = resolve_price(&docs, html);

        tracing::debug!(
            url,
            %availability,
            %tier,
            price = ?price,
            skipped_blocks = docs.skipped(),
            "classified page"
        );

        Classification {
            availability,
            price,
            tier,
        }
    }

    #[must_use]
    pub fn classify_availability(&self, html: &str, url: &str) -> AvailabilityState {
        let document = Html::parse_document(html);
        let docs = JsonLdDocuments::from_html(&document);
        self.resolve_availability(&document, &docs, url).0
    }

    #[must_use]
    pub fn extract_price(&self, html: &str) -> Option<f32> {
        let document = Html::parse_document(html);
        resolve_price(&JsonLdDocuments::from_html(&document), html)
    }

    /// First success wins; there is no backtracking between tiers.
    fn resolve_availability(
        &self,
        document: &Html,
        docs: &JsonLdDocuments,
        url: &str,
    ) -> (AvailabilityState, Tier) {
        if let Some(state) = structured_availability(docs, document).and_then(map_structured_label)
        {
            return (state, Tier::StructuredData);
        }

        if let Some(state) = button_availability(document) {
            return (state, Tier::Button);
        }

        let text = visible_text(document);
        let host = host_of(url);

        if let Some(found) = domain_availability(&self.rules, host.as_deref(), &text) {
            return (found.state, Tier::DomainRules);
        }

        if let Some(found) = generic_availability(&text) {
            return (found.state, Tier::GenericRules);
        }

        // Interstitials often carry the bot check only in the title.
        if let Some(found) = blocked_indicator(&page_title(document)) {
            return (found.state, Tier::GenericRules);
        }

        (AvailabilityState::Unknown, Tier::Default)
    }
}

/// Loose re-mapping of a structured label by substring.
///
/// Checks run in order `out`, `in`, `pre`, `discont`. "Discontinued" contains
/// "in", so a discontinued offer maps to `Available`; callers relying on
/// `Discontinued` from structured data never see it.
#[must_use]
pub fn map_structured_label(label: &str) -> Option<AvailabilityState> {
    let lower = label.to_lowercase();
    if lower.contains("out") {
        Some(AvailabilityState::OutOfStock)
    } else if lower.contains("in") {
        Some(AvailabilityState::Available)
    } else if lower.contains("pre") {
        Some(AvailabilityState::Preorder)
    } else if lower.contains("discont") {
        Some(AvailabilityState::Discontinued)
    } else {
        None
    }
}

fn resolve_price(docs: &JsonLdDocuments, html: &str) -> Option<f32> {
    structured_price(docs).or_else(|| extract_price_from_text(html))
}

/// Classifies availability using the built-in domain rule table.
#[must_use]
pub fn classify_availability(html: &str, url: &str) -> AvailabilityState {
    DEFAULT_CLASSIFIER.classify_availability(html, url)
}

/// Extracts a price: structured data first, then a currency-marked amount
/// anywhere in the raw HTML.
#[must_use]
pub fn extract_price(html: &str) -> Option<f32> {
    DEFAULT_CLASSIFIER.extract_price(html)
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
