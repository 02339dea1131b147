// src/lib.rs
// =============================================================================
// depthcrawl: a bounded-depth, multi-worker web crawler.
//
// Modules:
// - crawl:  the concurrent engine (frontier, workers, termination)
// - page:   fetching, link extraction and URL resolution
// - report: turning the final crawl state into files and console output
// - config: CrawlConfig
// - error:  CrawlError
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod page;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::{crawl_website, CrawlEngine, FinalState};
pub use error::{CrawlError, Result};
