// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
//   depthcrawl <START_URL> <MAX_DEPTH> [OPTIONS]
//
// The two positionals are required; clap turns a missing/extra argument or
// a non-integer depth into a usage error (exit code 2) before any crawling
// happens. Everything else is an optional flag with a sensible default.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use depthcrawl::config::{default_workers, DEFAULT_USER_AGENT};
use depthcrawl::page::ResolvePolicy;
use depthcrawl::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "depthcrawl",
    version,
    about = "Crawl a website to a fixed link depth and report which pages load",
    long_about = "depthcrawl starts at a URL, follows links breadth-first with a pool of \
                  concurrent workers, and stops at the given depth. It writes a per-depth \
                  success/failure report and a list of every URL it visited."
)]
pub struct Cli {
    /// URL to start crawling from (must be http or https)
    pub start_url: String,

    /// Maximum link depth to fetch (0 = only the start page)
    pub max_depth: u32,

    /// Number of concurrent workers [default: available CPU parallelism]
    #[arg(short, long, env = "DEPTHCRAWL_WORKERS")]
    pub workers: Option<usize>,

    /// Which link forms are followed
    #[arg(long, value_enum, default_value_t = ResolvePolicy::RootRelative)]
    pub resolve: ResolvePolicy,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Stop the whole crawl after this many seconds
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Where to write the per-depth results report
    #[arg(long, default_value = "results.txt")]
    pub results_file: PathBuf,

    /// Where to write the list of all visited URLs
    #[arg(long, default_value = "all_visited.txt")]
    pub visited_file: PathBuf,

    /// Print the final crawl state as JSON instead of a summary table
    #[arg(long)]
    pub json: bool,

    /// Exit with code 1 if any page failed to fetch
    #[arg(long)]
    pub fail_on_error: bool,
}

impl Cli {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.max_depth)
            .with_workers(self.workers.unwrap_or_else(default_workers))
            .with_resolve_policy(self.resolve)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_deadline(self.deadline_secs.map(Duration::from_secs))
            .with_user_agent(self.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["depthcrawl", "https://example.com", "2"]).unwrap();
        assert_eq!(cli.start_url, "https://example.com");
        assert_eq!(cli.max_depth, 2);
        assert_eq!(cli.resolve, ResolvePolicy::RootRelative);
        assert_eq!(cli.results_file, PathBuf::from("results.txt"));
        assert_eq!(cli.visited_file, PathBuf::from("all_visited.txt"));
        assert!(!cli.json);
    }

    #[test]
    fn test_missing_depth_is_usage_error() {
        let err = Cli::try_parse_from(["depthcrawl", "https://example.com"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_extra_argument_is_usage_error() {
        let err = Cli::try_parse_from(["depthcrawl", "https://example.com", "2", "extra"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_non_integer_depth_is_rejected() {
        let err = Cli::try_parse_from(["depthcrawl", "https://example.com", "two"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_flags_flow_into_config() {
        let cli = Cli::try_parse_from([
            "depthcrawl",
            "https://example.com",
            "3",
            "--workers",
            "4",
            "--resolve",
            "full",
            "--timeout-secs",
            "5",
            "--deadline-secs",
            "60",
        ])
        .unwrap();

        let config = cli.to_config();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.workers, 4);
        assert_eq!(config.resolve_policy, ResolvePolicy::Full);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.deadline, Some(Duration::from_secs(60)));
    }
}
