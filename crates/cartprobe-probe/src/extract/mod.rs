//! Multi-strategy extraction engine.
//!
//! Templated storefronts vary in where identifiers surface: anchor query
//! strings, hidden form fields, data attributes, form action URLs, or
//! JSON-LD blocks. No single strategy is reliable, so every query in a set
//! runs (no short-circuit) and the results are merged into one deduplicated,
//! first-seen-ordered candidate list.
//!
//! html5ever (via `scraper`) parses leniently: malformed markup, unclosed
//! tags, and missing doctypes never fail, they just yield a best-effort tree.

mod jsonld;
mod queries;

use regex::Regex;
use scraper::{Html, Selector};

pub use queries::{PAYMENT_QUERIES, PRODUCT_QUERIES};

/// One extraction strategy. Strategy sets are static and ordered; order is
/// the priority used when merging candidates.
#[derive(Debug, Clone, Copy)]
pub enum ExtractionQuery {
    /// Regex over the raw payload; capture group 1 is the candidate.
    Pattern(&'static str),
    /// CSS selector over the parsed tree. With `attr`, the candidate is that
    /// attribute's value; without, the node's text content.
    Selector {
        selector: &'static str,
        attr: Option<&'static str>,
    },
    /// `<script type="application/ld+json">` blocks whose `@type` is
    /// `"Product"`; the candidate is the record's `sku`.
    ProductJsonLd,
}

const JSONLD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Runs every query against `html` in order and returns the merged candidate
/// set: deduplicated, first-seen order preserved, empty values dropped.
///
/// Values containing `add-to-cart=<digits>` are reduced to the digits before
/// merging, so an href candidate and a hidden-field candidate for the same
/// product collapse to one entry.
#[must_use]
pub fn extract(html: &str, queries: &[ExtractionQuery]) -> Vec<String> {
    let document = Html::parse_document(html);
    let add_to_cart_re = Regex::new(r"add-to-cart=(\d+)").expect("valid regex");

    let mut candidates: Vec<String> = Vec::new();
    let push = |raw: &str, candidates: &mut Vec<String>| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let value = match add_to_cart_re.captures(trimmed) {
            Some(caps) => caps[1].to_string(),
            None => trimmed.to_string(),
        };
        if !candidates.contains(&value) {
            candidates.push(value);
        }
    };

    for query in queries {
        match query {
            ExtractionQuery::Pattern(pattern) => {
                let re = Regex::new(pattern).expect("valid extraction pattern");
                for caps in re.captures_iter(html) {
                    if let Some(group) = caps.get(1) {
                        push(group.as_str(), &mut candidates);
                    }
                }
            }
            ExtractionQuery::Selector { selector, attr } => {
                let sel = Selector::parse(selector).expect("valid extraction selector");
                for element in document.select(&sel) {
                    let raw = match attr {
                        Some(name) => element.attr(name).map(str::to_owned),
                        None => Some(element.text().collect::<String>()),
                    };
                    if let Some(raw) = raw {
                        push(&raw, &mut candidates);
                    }
                }
            }
            ExtractionQuery::ProductJsonLd => {
                let sel = Selector::parse(JSONLD_SELECTOR).expect("valid extraction selector");
                for element in document.select(&sel) {
                    let text = element.text().collect::<String>();
                    for sku in jsonld::product_skus(&text) {
                        push(&sku, &mut candidates);
                    }
                }
            }
        }
    }

    candidates
}

/// Product-identifier extraction over the full product strategy set.
#[must_use]
pub fn product_ids_from_html(html: &str) -> Vec<String> {
    extract(html, PRODUCT_QUERIES)
}

/// Sentinel radio values that appear under payment containers for unrelated
/// UI state ("use a new card", hidden toggles) and are never gateway slugs.
const PAYMENT_SENTINELS: &[&str] = &["new", "true"];

/// Payment-method extraction over the checkout strategy set, with sentinel
/// values filtered out.
#[must_use]
pub fn payment_methods_from_html(html: &str) -> Vec<String> {
    let mut methods = extract(html, PAYMENT_QUERIES);
    methods.retain(|m| !PAYMENT_SENTINELS.contains(&m.as_str()));
    methods
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
