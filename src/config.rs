// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Everything the engine and the default collaborators need to know lives in
// CrawlConfig. The CLI builds one from its arguments; library users can start
// from CrawlConfig::new(max_depth) and adjust it with the with_* builders.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CrawlError, Result};
use crate::page::ResolvePolicy;

/// User agent sent by the default HTTP fetcher.
pub const DEFAULT_USER_AGENT: &str = concat!("depthcrawl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Deepest level that is fetched. The seed is depth 0.
    pub max_depth: u32,
    /// Number of concurrent crawl workers.
    pub workers: usize,
    /// Upper bound on how long an idle worker waits before re-checking the frontier.
    pub poll_interval: Duration,
    /// Per-request timeout for the HTTP fetcher.
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Which raw link forms the default resolver accepts.
    pub resolve_policy: ResolvePolicy,
    /// Cancel the whole crawl after this long, if set.
    pub deadline: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            workers: default_workers(),
            poll_interval: Duration::from_millis(100),
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            resolve_policy: ResolvePolicy::default(),
            deadline: None,
        }
    }
}

impl CrawlConfig {
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = policy;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CrawlError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(CrawlError::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// The host's available parallelism, or 1 if it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
