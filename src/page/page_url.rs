// src/page/page_url.rs
// =============================================================================
// PageUrl: a crawlable URL broken into explicit parts.
//
// Parsing goes through the `url` crate, so we get WHATWG-compliant handling
// of case, default ports, percent-encoding and IPv6 hosts for free. On top of
// that we only accept what a crawler can actually fetch: http/https with a
// host.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{CrawlError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageUrl {
    /// Always "http" or "https"
    pub scheme: String,
    /// Lowercased host; IPv6 hosts keep their brackets
    pub host: String,
    /// Only set when it differs from the scheme's default port
    pub port: Option<u16>,
    /// Always starts with '/'
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl PageUrl {
    /// Parses an absolute http(s) URL.
    ///
    /// Examples:
    ///   "https://Example.com:443/a?b" -> host "example.com", port None
    ///   "mailto:someone@example.com"  -> Err(UnsupportedScheme)
    ///   "/docs"                       -> Err(InvalidUrl), not absolute
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|source| CrawlError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        Self::from_url(&url)
    }

    pub fn from_url(url: &Url) -> Result<Self> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(CrawlError::UnsupportedScheme(scheme.to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CrawlError::MissingHost(url.to_string()))?;

        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port: url.port(),
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            fragment: url.fragment().map(str::to_string),
        })
    }

    /// "scheme://host[:port]" with no trailing slash.
    pub fn origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// Converts back into a `url::Url`, for callers that need full RFC 3986 joins.
    pub fn to_url(&self) -> Result<Url> {
        let rendered = self.to_string();
        Url::parse(&rendered).map_err(|source| CrawlError::InvalidUrl {
            url: rendered,
            source,
        })
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
