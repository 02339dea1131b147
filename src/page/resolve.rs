// src/page/resolve.rs
// =============================================================================
// Turning raw href values into absolute, crawlable URLs.
//
// How much of RFC 3986 we honour is an explicit ResolvePolicy instead of
// whatever some string slicing happens to support:
//
//   AbsoluteOnly   "https://a.com/x"                         -> kept
//   RootRelative   ... plus "/x" and "//cdn.a.com/x"         -> joined to base
//   Full           ... plus "x", "../x", "?q"                -> Url::join
//
// RootRelative is the default. Anything that is not http(s) once resolved
// (mailto:, javascript:, tel:, data:) and fragment-only links are dropped
// under every policy.
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use super::PageUrl;

/// Resolves a raw link found on `base` into an absolute URL.
///
/// Returning `None` is not an error, it just means the link is not usable
/// input for the crawl.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, base: &str, raw: &str) -> Option<String>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    /// Only links that are already absolute http(s) URLs
    #[value(name = "absolute")]
    #[serde(rename = "absolute")]
    AbsoluteOnly,
    /// Absolute links plus links rooted at the base origin ("/path", "//host/path")
    #[default]
    RootRelative,
    /// Full relative resolution, the way a browser does it
    Full,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyResolver {
    policy: ResolvePolicy,
}

impl PolicyResolver {
    pub fn new(policy: ResolvePolicy) -> Self {
        Self { policy }
    }
}

impl UrlResolver for PolicyResolver {
    fn resolve(&self, base: &str, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            return None;
        }

        // Absolute links: accepted under every policy, as long as they are http(s)
        match Url::parse(raw) {
            Ok(url) => return PageUrl::from_url(&url).ok().map(|u| u.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(_) => return None,
        }

        let base = PageUrl::parse(base).ok()?;

        let resolved = match self.policy {
            ResolvePolicy::AbsoluteOnly => return None,
            ResolvePolicy::RootRelative => {
                if raw.starts_with("//") {
                    PageUrl::parse(&format!("{}:{}", base.scheme, raw)).ok()?
                } else if raw.starts_with('/') {
                    PageUrl::parse(&format!("{}{}", base.origin(), raw)).ok()?
                } else {
                    return None;
                }
            }
            ResolvePolicy::Full => {
                let joined = base.to_url().ok()?.join(raw).ok()?;
                PageUrl::from_url(&joined).ok()?
            }
        };

        Some(resolved.to_string())
    }
}
