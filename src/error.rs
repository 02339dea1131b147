// src/error.rs
// =============================================================================
// Library error type.
//
// The crawl itself never fails because of a single page: fetch failures are
// values (see page::FetchError) and end up in the result ledger. CrawlError
// only covers things that stop us before or after the crawl: a bad seed URL,
// an HTTP client that cannot be built, or report files that cannot be written.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme '{0}' (only http and https can be crawled)")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Invalid crawl configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
