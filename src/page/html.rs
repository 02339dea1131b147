// src/page/html.rs
// =============================================================================
// This module extracts raw links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup is handled the way browsers do
//
// Extraction is deliberately dumb: we return href values exactly as written
// (trimmed), and leave turning them into absolute URLs to the UrlResolver.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Pulls raw link strings out of page content.
///
/// Implementations must be pure: no network access and no shared state.
/// The returned links are unique within the page, in first-seen order.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, content: &str) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    selector: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        // "a[href]" is a constant, known-valid selector
        let selector = Selector::parse("a[href]").expect("a[href] is a valid CSS selector");
        Self { selector }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, content: &str) -> Vec<String> {
        let document = Html::parse_document(content);

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            let href = href.trim();
            if href.is_empty() {
                continue;
            }

            if seen.insert(href.to_string()) {
                links.push(href.to_string());
            }
        }

        links
    }
}
