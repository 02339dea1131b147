// src/crawl/worker.rs
// =============================================================================
// One crawl worker. The engine runs N of these as tokio tasks over a shared
// Frontier.
//
// Per worker, the loop is:
//
//   Idle -> Claiming --Task--> Processing -> Idle
//              |
//              +--Empty, frontier done------> Terminated
//              +--Empty, work in flight-----> wait, then Claiming again
//
// The wait is a Notify fired by the frontier on every enqueue and finished
// task, capped by the poll interval so a worker never sleeps indefinitely.
//
// Processing a task:
//   1. depth > max_depth: claimed (so it stays deduplicated) but not fetched
//   2. fetch; any FetchError counts as a failed result
//   3. record exactly one result for the task
//   4. on success, extract + resolve links and enqueue them at depth + 1
//   5. finish the task (via InFlightGuard, so this also happens on panic)
//
// A task dropped because of cancellation, or whose processing panicked, is
// marked abandoned in the frontier. The worker itself keeps going after a
// panic; only that URL is lost.
//
// The frontier lock is never held across the fetch or the extraction.
// =============================================================================

use futures::FutureExt;
use std::any::Any;
use std::ops::AddAssign;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::frontier::{Frontier, InFlightGuard};
use super::state::{Claim, Task};
use crate::page::{Fetcher, LinkExtractor, UrlResolver};

/// The three external collaborators a worker calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub resolver: Arc<dyn UrlResolver>,
}

/// What a single worker did over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub fetched: usize,
    pub failed: usize,
    pub depth_exceeded: usize,
    pub links_enqueued: usize,
    pub panicked: usize,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.fetched += other.fetched;
        self.failed += other.failed;
        self.depth_exceeded += other.depth_exceeded;
        self.links_enqueued += other.links_enqueued;
        self.panicked += other.panicked;
    }
}

pub struct CrawlWorker {
    id: usize,
    frontier: Arc<Frontier>,
    collaborators: Collaborators,
    max_depth: u32,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl CrawlWorker {
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        collaborators: Collaborators,
        max_depth: u32,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            frontier,
            collaborators,
            max_depth,
            poll_interval,
            cancel,
        }
    }

    /// Runs until the frontier is exhausted or the crawl is cancelled.
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::default();

        while let Some(task) = self.next_task().await {
            let _in_flight = InFlightGuard::new(&self.frontier);

            // A panicking collaborator costs this one URL, not the worker
            let outcome = AssertUnwindSafe(self.process(&task, &mut stats))
                .catch_unwind()
                .await;
            if let Err(panic) = outcome {
                error!(
                    worker = self.id,
                    url = %task.url,
                    panic = panic_message(&*panic),
                    "page processing panicked, abandoning URL"
                );
                self.frontier.abandon(&task.url);
                stats.panicked += 1;
            }
        }

        debug!(
            worker = self.id,
            fetched = stats.fetched,
            failed = stats.failed,
            depth_exceeded = stats.depth_exceeded,
            panicked = stats.panicked,
            "worker terminated"
        );
        stats
    }

    // Claiming state. Returns None when the worker should terminate.
    async fn next_task(&self) -> Option<Task> {
        loop {
            if self.cancel.is_cancelled() {
                return None;
            }

            // Register for wake-ups before looking, so nothing slips in between
            let changed = self.frontier.changed();
            tokio::pin!(changed);
            changed.as_mut().enable();

            match self.frontier.try_claim() {
                Claim::Task(task) => return Some(task),
                Claim::Empty if self.frontier.is_done() => return None,
                Claim::Empty => {
                    trace!(worker = self.id, "frontier starved, waiting");
                    tokio::select! {
                        _ = &mut changed => {}
                        _ = tokio::time::sleep(self.poll_interval) => {}
                        _ = self.cancel.cancelled() => return None,
                    }
                }
            }
        }
    }

    async fn process(&self, task: &Task, stats: &mut WorkerStats) {
        if self.cancel.is_cancelled() {
            debug!(worker = self.id, url = %task.url, "crawl cancelled, dropping claimed task");
            self.frontier.abandon(&task.url);
            return;
        }

        if task.depth > self.max_depth {
            trace!(worker = self.id, depth = task.depth, url = %task.url, "beyond max depth, not fetching");
            stats.depth_exceeded += 1;
            return;
        }

        debug!(worker = self.id, depth = task.depth, url = %task.url, "crawling");

        let content = match self.collaborators.fetcher.fetch(&task.url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(worker = self.id, depth = task.depth, url = %task.url, error = %e, "failed to fetch");
                None
            }
        };

        self.frontier
            .record_result(task.depth, &task.url, content.is_some());

        let Some(content) = content else {
            stats.failed += 1;
            return;
        };
        stats.fetched += 1;

        let children: Vec<String> = self
            .collaborators
            .extractor
            .extract_links(&content)
            .into_iter()
            .filter_map(|raw| {
                let resolved = self.collaborators.resolver.resolve(&task.url, &raw);
                if resolved.is_none() {
                    trace!(base = %task.url, link = %raw, "dropping unresolvable link");
                }
                resolved
            })
            .collect();

        stats.links_enqueued += self
            .frontier
            .enqueue_children(children, task.depth.saturating_add(1));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
