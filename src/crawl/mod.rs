// src/crawl/mod.rs
// =============================================================================
// This module handles the concurrent crawl.
//
// Pieces:
// - frontier: the shared queue / visited set / result ledger / in-flight count
// - worker:   the claim -> fetch -> record -> expand loop run by each worker
// - engine:   spawns the workers, waits for them, returns the final state
// - state:    plain data passed between the above and the reports
// =============================================================================

mod engine;
mod frontier;
mod state;
mod worker;

#[cfg(test)]
mod testing;

pub use engine::{crawl_website, CrawlEngine};
pub use frontier::Frontier;
pub use state::{Claim, CrawlRecord, DepthSummary, FinalState, Task};
pub use worker::{Collaborators, CrawlWorker, WorkerStats};
