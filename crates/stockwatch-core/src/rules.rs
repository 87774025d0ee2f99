//! Per-site phrase rules keyed by registrable domain.
//!
//! The table is configuration-as-data: it is built once (the built-in
//! constant, optionally merged with a YAML rules file at startup) and shared
//! read-only afterwards. Nothing mutates a table after it has been handed out.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use serde::Serialize;

/// Curated phrases for one site. All phrases are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainRuleSet {
    pub positives: BTreeSet<String>,
    pub negatives: BTreeSet<String>,
}

impl DomainRuleSet {
    #[must_use]
    pub fn new<P, N>(positives: P, negatives: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            positives: positives
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .collect(),
            negatives: negatives
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Returns the first negative phrase contained in `text`, if any.
    ///
    /// `text` must already be lower-cased.
    #[must_use]
    pub fn matching_negative(&self, text: &str) -> Option<&str> {
        self.negatives
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
            .map(String::as_str)
    }

    /// Returns the first positive phrase contained in `text`, if any.
    ///
    /// `text` must already be lower-cased.
    #[must_use]
    pub fn matching_positive(&self, text: &str) -> Option<&str> {
        self.positives
            .iter()
            .find(|phrase| text.contains(phrase.as_str()))
            .map(String::as_str)
    }

    pub(crate) fn absorb(&mut self, other: DomainRuleSet) {
        self.positives.extend(other.positives);
        self.negatives.extend(other.negatives);
    }
}

/// Immutable mapping from domain (e.g. `"ebgames.ca"`) to its [`DomainRuleSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainRuleTable {
    rules: BTreeMap<String, DomainRuleSet>,
}

static BUILTIN: LazyLock<DomainRuleTable> = LazyLock::new(|| {
    DomainRuleTable::from_entries([
        (
            "ebgames.ca",
            DomainRuleSet::new(
                [
                    "add to cart",
                    "buy now",
                    "in stock",
                    "available online",
                    "ship to home",
                    "pick up today",
                    "online availability: in stock",
                ],
                [
                    "out of stock",
                    "sold out",
                    "unavailable",
                    "not available",
                    "no longer available",
                    "coming soon",
                    "pre-order",
                    "preorder",
                    "pre order",
                    "online availability: out of stock",
                ],
            ),
        ),
        (
            "gamestop.ca",
            DomainRuleSet::new(
                ["add to cart", "buy now", "in stock", "available online"],
                [
                    "out of stock",
                    "sold out",
                    "unavailable",
                    "not available",
                    "coming soon",
                    "pre-order",
                    "preorder",
                    "pre order",
                ],
            ),
        ),
        (
            "amazon.ca",
            DomainRuleSet::new(
                ["in stock", "add to cart", "buy now"],
                [
                    "currently unavailable",
                    "temporarily out of stock",
                    "out of stock",
                ],
            ),
        ),
    ])
});

impl DomainRuleTable {
    /// The curated table compiled into the binary.
    #[must_use]
    pub fn builtin() -> &'static DomainRuleTable {
        &BUILTIN
    }

    #[must_use]
    pub fn from_entries<I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (D, DomainRuleSet)>,
        D: AsRef<str>,
    {
        let mut rules = BTreeMap::new();
        for (domain, set) in entries {
            rules
                .entry(normalize_host(domain.as_ref()))
                .or_insert_with(DomainRuleSet::default)
                .absorb(set);
        }
        Self { rules }
    }

    /// Finds the rule set for `host`.
    ///
    /// A domain matches when the host equals it or is one of its subdomains;
    /// with several candidates the longest (most specific) domain wins. The
    /// host is normalized first: lower-cased, trailing dot and leading `www.`
    /// removed.
    #[must_use]
    pub fn lookup(&self, host: &str) -> Option<(&str, &DomainRuleSet)> {
        let host = normalize_host(host);
        self.rules
            .iter()
            .filter(|(domain, _)| {
                host == **domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .max_by_key(|(domain, _)| domain.len())
            .map(|(domain, set)| (domain.as_str(), set))
    }

    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&DomainRuleSet> {
        self.rules.get(&normalize_host(domain))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainRuleSet)> {
        self.rules.iter().map(|(d, s)| (d.as_str(), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Consumes the table and returns one with `set` merged into `domain`.
    pub(crate) fn merged(mut self, domain: &str, set: DomainRuleSet, replace: bool) -> Self {
        let key = normalize_host(domain);
        if replace {
            self.rules.insert(key, set);
        } else {
            self.rules.entry(key).or_default().absorb(set);
        }
        self
    }
}

/// Lower-cases a host and strips a trailing dot and a leading `www.`.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
