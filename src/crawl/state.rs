// src/crawl/state.rs
// =============================================================================
// Plain data types passed between the frontier, the workers and the reports.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One unit of pending work: a URL discovered at a given link distance from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    pub depth: u32,
}

/// Outcome of `Frontier::try_claim`.
#[derive(Debug, PartialEq, Eq)]
pub enum Claim {
    /// Nothing claimable right now. Check `is_done` before giving up.
    Empty,
    /// This worker now owns the task; its URL is marked visited.
    Task(Task),
}

/// A single fetch outcome in the result ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    pub url: String,
    pub success: bool,
}

/// Success/failure counts for one depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSummary {
    pub successful: usize,
    pub failed: usize,
}

impl DepthSummary {
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }
}

/// Read-only snapshot of the frontier once every worker has exited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalState {
    /// Every URL that was claimed, in sorted order
    pub visited: BTreeSet<String>,
    /// Fetch results grouped by depth, each list in the order it was recorded
    pub results_by_depth: BTreeMap<u32, Vec<CrawlRecord>>,
    /// Claimed URLs dropped before processing, by cancellation or a panic
    #[serde(default)]
    pub abandoned: BTreeSet<String>,
    /// True if the crawl was stopped before the frontier was exhausted
    #[serde(default)]
    pub cancelled: bool,
}

impl FinalState {
    /// URLs that have a ledger entry (fetched, successfully or not).
    pub fn processed_urls(&self) -> HashSet<&str> {
        self.results_by_depth
            .values()
            .flatten()
            .map(|record| record.url.as_str())
            .collect()
    }

    /// Visited URLs with no ledger entry that were not abandoned, i.e.
    /// claimed beyond the depth limit.
    pub fn unprocessed_urls(&self) -> Vec<&str> {
        let processed = self.processed_urls();
        self.visited
            .iter()
            .map(String::as_str)
            .filter(|url| !processed.contains(url) && !self.abandoned.contains(*url))
            .collect()
    }

    pub fn summary(&self, depth: u32) -> DepthSummary {
        let mut summary = DepthSummary::default();
        for record in self.results_by_depth.get(&depth).into_iter().flatten() {
            if record.success {
                summary.successful += 1;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }

    /// Per-depth summaries in ascending depth order.
    pub fn summaries(&self) -> BTreeMap<u32, DepthSummary> {
        self.results_by_depth
            .keys()
            .map(|&depth| (depth, self.summary(depth)))
            .collect()
    }

    pub fn total_failed(&self) -> usize {
        self.summaries().values().map(|s| s.failed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, success: bool) -> CrawlRecord {
        CrawlRecord {
            url: url.to_string(),
            success,
        }
    }

    fn sample() -> FinalState {
        let mut state = FinalState::default();
        for url in ["http://a.test/", "http://a.test/b", "http://a.test/c", "http://a.test/d"] {
            state.visited.insert(url.to_string());
        }
        state
            .results_by_depth
            .insert(0, vec![record("http://a.test/", true)]);
        state.results_by_depth.insert(
            1,
            vec![record("http://a.test/b", false), record("http://a.test/c", true)],
        );
        state
    }

    #[test]
    fn test_unprocessed_urls() {
        let state = sample();
        assert_eq!(state.unprocessed_urls(), vec!["http://a.test/d"]);
        assert_eq!(state.processed_urls().len(), 3);
    }

    #[test]
    fn test_abandoned_urls_are_not_unprocessed() {
        let mut state = sample();
        state.abandoned.insert("http://a.test/d".to_string());
        assert!(state.unprocessed_urls().is_empty());
    }

    #[test]
    fn test_summaries() {
        let state = sample();
        assert_eq!(state.summary(0), DepthSummary { successful: 1, failed: 0 });
        assert_eq!(state.summary(1).total(), 2);
        assert_eq!(state.summary(7), DepthSummary::default());
        assert_eq!(state.total_failed(), 1);
        assert_eq!(state.summaries().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }
}
