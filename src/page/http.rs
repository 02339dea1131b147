// src/page/http.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// Key functionality:
// - The Fetcher trait: the crawl engine's only view of the network
// - HttpFetcher: the reqwest-backed default implementation
// - FetchError: failure as a value, so a dead link never aborts a crawl
//
// A fetch succeeds only on a 2xx status. Redirects are followed (up to 5)
// before the status is looked at.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::CrawlConfig;
use crate::error::Result;

/// Why a page could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("{}: {source}", describe_transport(.source))]
    Transport {
        #[from]
        source: reqwest::Error,
    },
}

/// Retrieves page content for the crawl engine.
///
/// Implementations must not panic on network problems; every failure is
/// reported through `FetchError`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the timeout and user agent from `config`.
    ///
    /// The client is shared by all workers; reqwest pools connections
    /// internally, so cloning it is just a reference count bump.
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.text().await?)
    }
}

// Short, human-readable category for a reqwest error
fn describe_transport(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "request timed out"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_body() || error.is_decode() {
        "could not read response body"
    } else {
        "request failed"
    }
}
