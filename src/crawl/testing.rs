// src/crawl/testing.rs
// In-memory link graph used by the crawl tests in place of HTTP.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::time::Duration;

use crate::page::{FetchError, Fetcher};

#[derive(Default)]
pub(crate) struct GraphFetcher {
    // None = the page exists but fails to fetch
    pages: HashMap<String, Option<String>>,
    delay: Duration,
    calls: Mutex<HashMap<String, usize>>,
    order: Mutex<Vec<String>>,
}

impl GraphFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a page whose body links to each of `links` (as written).
    pub(crate) fn page(mut self, url: &str, links: &[&str]) -> Self {
        let body: String = links
            .iter()
            .map(|link| format!(r#"<a href="{}">{}</a>"#, link, link))
            .collect();
        self.pages
            .insert(url.to_string(), Some(format!("<html><body>{}</body></html>", body)));
        self
    }

    pub(crate) fn failing(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), None);
        self
    }

    /// Makes every fetch take this long, to force workers to overlap.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn fetch_count(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }

    pub(crate) fn total_fetches(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Every fetched URL, in the order the fetches started.
    pub(crate) fn fetch_order(&self) -> Vec<String> {
        self.order.lock().clone()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        *self.calls.lock().entry(url.to_string()).or_default() += 1;
        self.order.lock().push(url.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.pages.get(url) {
            Some(Some(body)) => Ok(body.clone()),
            Some(None) => Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            None => Err(FetchError::Status(StatusCode::NOT_FOUND)),
        }
    }
}
