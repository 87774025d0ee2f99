//! Linked-data (`application/ld+json`) block extraction and traversal.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::{Map, Value};

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("valid script selector"));

/// Every successfully parsed linked-data document on a page.
#[derive(Debug, Clone, Default)]
pub struct JsonLdDocuments {
    documents: Vec<Value>,
    skipped: usize,
}

impl JsonLdDocuments {
    /// Collects and parses every `<script>` whose `type` contains `ld+json`
    /// (case-insensitive).
    ///
    /// A block that is empty or not valid JSON is skipped and counted; it never
    /// prevents the remaining blocks from being parsed.
    #[must_use]
    pub fn from_html(html: &Html) -> Self {
        let mut documents = Vec::new();
        let mut skipped = 0usize;

        for script in html.select(&SCRIPT_SELECTOR) {
            let is_linked_data = script
                .value()
                .attr("type")
                .is_some_and(|t| t.to_ascii_lowercase().contains("ld+json"));
            if !is_linked_data {
                continue;
            }

            let raw = script.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => documents.push(value),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed linked-data block");
                    skipped += 1;
                }
            }
        }

        Self { documents, skipped }
    }

    #[must_use]
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// Number of linked-data blocks that failed to parse.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Single-pass iterator over every object node of every document,
    /// depth-first, in document order.
    #[must_use]
    pub fn nodes(&self) -> ObjectNodes<'_> {
        ObjectNodes::new(&self.documents)
    }
}

/// Depth-first pre-order walk over JSON object nodes.
///
/// Uses an explicit stack, so arbitrarily nested input cannot exhaust the call
/// stack. Arrays are transparent: their elements are visited but the arrays
/// themselves are not yielded. Scalars are never yielded.
#[derive(Debug)]
pub struct ObjectNodes<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> ObjectNodes<'a> {
    #[must_use]
    pub fn new(roots: &'a [Value]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ObjectNodes<'a> {
    type Item = &'a Map<String, Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.stack.pop() {
            match value {
                Value::Object(map) => {
                    self.stack.extend(map.values().rev());
                    return Some(map);
                }
                Value::Array(items) => self.stack.extend(items.iter().rev()),
                _ => {}
            }
        }
        None
    }
}
