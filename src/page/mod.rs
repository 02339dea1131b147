// src/page/mod.rs
// =============================================================================
// Everything the crawl engine needs to know about a single page, behind
// three narrow interfaces:
//
// - Fetcher:       URL -> page text, or a FetchError value
// - LinkExtractor: page text -> raw link strings
// - UrlResolver:   (base URL, raw link) -> absolute URL, or None
//
// The engine only ever talks to these traits. The default implementations
// (HttpFetcher, HtmlLinkExtractor, PolicyResolver) live next to them, and
// tests swap in in-memory fakes.
// =============================================================================

mod html;
mod http;
mod page_url;
mod resolve;

pub use html::{HtmlLinkExtractor, LinkExtractor};
pub use http::{FetchError, Fetcher, HttpFetcher};
pub use page_url::PageUrl;
pub use resolve::{PolicyResolver, ResolvePolicy, UrlResolver};
