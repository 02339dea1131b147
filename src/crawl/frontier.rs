// src/crawl/frontier.rs
// =============================================================================
// The frontier: all mutable crawl state shared between workers.
//
// These structures live behind ONE mutex and are always updated together:
// - queue:     FIFO of pending tasks, NOT deduplicated
// - visited:   URLs that have been claimed (inserted at claim time, never
//              at enqueue time, so a URL discovered twice is still only
//              processed once)
// - ledger:    depth -> fetch results, append-only
// - abandoned: claimed URLs dropped by cancellation or a panic
// - in_flight: tasks claimed but not fully processed yet
//
// Termination rule: the crawl is done when the queue is empty AND nothing
// is in flight. A worker only decrements in_flight after it has enqueued
// every child of its task, so while in_flight > 0 the queue may still grow.
// Reading both fields under the same lock is what makes that check safe.
//
// No method does I/O or awaits while holding the lock.
// =============================================================================

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet, VecDeque};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use super::state::{Claim, CrawlRecord, FinalState, Task};

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<Task>,
    visited: HashSet<String>,
    ledger: BTreeMap<u32, Vec<CrawlRecord>>,
    abandoned: HashSet<String>,
    in_flight: usize,
}

impl FrontierState {
    fn is_done(&self) -> bool {
        self.queue.is_empty() && self.in_flight == 0
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    // Fired whenever the queue grows or a task finishes
    changed: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the start URL at depth 0. Call once, before any worker starts.
    pub fn seed(&self, url: impl Into<String>) {
        self.enqueue_child(url, 0);
    }

    /// Pops tasks until one with an unvisited URL turns up, and claims it.
    ///
    /// Already-visited duplicates are discarded inside the same critical
    /// section, so two workers can never claim the same URL.
    pub fn try_claim(&self) -> Claim {
        let mut state = self.state.lock();

        while let Some(task) = state.queue.pop_front() {
            if state.visited.contains(&task.url) {
                continue;
            }

            state.visited.insert(task.url.clone());
            state.in_flight += 1;
            return Claim::Task(task);
        }

        Claim::Empty
    }

    pub fn record_result(&self, depth: u32, url: &str, success: bool) {
        self.state
            .lock()
            .ledger
            .entry(depth)
            .or_default()
            .push(CrawlRecord {
                url: url.to_string(),
                success,
            });
    }

    /// Marks a claimed URL as dropped before it could be processed
    /// (cancellation, or a panic while processing it).
    pub fn abandon(&self, url: &str) {
        self.state.lock().abandoned.insert(url.to_string());
    }

    /// Queues a discovered URL. Deduplication happens at claim time.
    pub fn enqueue_child(&self, url: impl Into<String>, depth: u32) {
        self.state.lock().queue.push_back(Task {
            url: url.into(),
            depth,
        });
        self.changed.notify_waiters();
    }

    /// Queues all links from one page under a single lock, keeping their order.
    /// Returns how many tasks were added.
    pub fn enqueue_children<I>(&self, urls: I, depth: u32) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let added = {
            let mut state = self.state.lock();
            let before = state.queue.len();
            state
                .queue
                .extend(urls.into_iter().map(|url| Task { url, depth }));
            state.queue.len() - before
        };

        if added > 0 {
            self.changed.notify_waiters();
        }
        added
    }

    /// Marks one claimed task as fully processed.
    pub fn finish_task(&self) {
        {
            let mut state = self.state.lock();
            debug_assert!(state.in_flight > 0, "finish_task without a claimed task");
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.changed.notify_waiters();
    }

    /// True iff the queue is empty and no task is in flight.
    pub fn is_done(&self) -> bool {
        self.state.lock().is_done()
    }

    /// A future that resolves on the next enqueue or finished task.
    ///
    /// Call `enable()` on it (pinned) before checking the frontier, so a
    /// change between the check and the await is not missed.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    /// Copies out the visited set, ledger and abandoned URLs.
    pub fn snapshot(&self) -> FinalState {
        let state = self.state.lock();
        FinalState {
            visited: state.visited.iter().cloned().collect(),
            results_by_depth: state.ledger.clone(),
            abandoned: state.abandoned.iter().cloned().collect(),
            cancelled: false,
        }
    }
}

/// Calls `finish_task` when dropped, including while unwinding from a panic
/// in a collaborator, so a crashed task never blocks termination.
pub(crate) struct InFlightGuard<'a> {
    frontier: &'a Frontier,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn new(frontier: &'a Frontier) -> Self {
        Self { frontier }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.frontier.finish_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn claim_url(frontier: &Frontier) -> Option<(String, u32)> {
        match frontier.try_claim() {
            Claim::Task(task) => Some((task.url, task.depth)),
            Claim::Empty => None,
        }
    }

    #[test]
    fn test_seed_is_depth_zero() {
        let frontier = Frontier::new();
        frontier.seed("http://a.test/");
        assert_eq!(claim_url(&frontier), Some(("http://a.test/".to_string(), 0)));
    }

    #[test]
    fn test_fifo_order() {
        let frontier = Frontier::new();
        frontier.enqueue_children(
            vec!["http://a.test/1".to_string(), "http://a.test/2".to_string()],
            1,
        );
        frontier.enqueue_child("http://a.test/3", 2);

        assert_eq!(claim_url(&frontier).unwrap().0, "http://a.test/1");
        assert_eq!(claim_url(&frontier).unwrap().0, "http://a.test/2");
        assert_eq!(claim_url(&frontier), Some(("http://a.test/3".to_string(), 2)));
        assert_eq!(claim_url(&frontier), None);
    }

    #[test]
    fn test_duplicates_skipped_at_claim_time() {
        let frontier = Frontier::new();
        frontier.enqueue_child("http://a.test/x", 1);
        frontier.enqueue_child("http://a.test/x", 2);
        frontier.enqueue_child("http://a.test/y", 2);

        // Duplicates are stored, not filtered on enqueue
        assert_eq!(frontier.queued(), 3);

        assert_eq!(claim_url(&frontier), Some(("http://a.test/x".to_string(), 1)));
        // The depth-2 copy of x is discarded in the same call
        assert_eq!(claim_url(&frontier), Some(("http://a.test/y".to_string(), 2)));
        assert_eq!(claim_url(&frontier), None);
        assert_eq!(frontier.queued(), 0);
    }

    #[test]
    fn test_url_claimed_once_even_after_finish() {
        let frontier = Frontier::new();
        frontier.seed("http://a.test/");
        assert!(claim_url(&frontier).is_some());
        frontier.finish_task();

        frontier.enqueue_child("http://a.test/", 3);
        assert_eq!(claim_url(&frontier), None);
        assert!(frontier.is_done());
    }

    #[test]
    fn test_is_done_requires_no_in_flight() {
        let frontier = Frontier::new();
        assert!(frontier.is_done());

        frontier.seed("http://a.test/");
        assert!(!frontier.is_done());

        assert!(claim_url(&frontier).is_some());
        // Queue empty, but the claimed task may still produce children
        assert_eq!(frontier.queued(), 0);
        assert_eq!(frontier.in_flight(), 1);
        assert!(!frontier.is_done());

        frontier.finish_task();
        assert!(frontier.is_done());
    }

    #[test]
    fn test_record_result_groups_by_depth() {
        let frontier = Frontier::new();
        frontier.record_result(1, "http://a.test/b", false);
        frontier.record_result(0, "http://a.test/", true);
        frontier.record_result(1, "http://a.test/c", true);

        let state = frontier.snapshot();
        assert_eq!(state.results_by_depth.len(), 2);
        let depth_one: Vec<_> = state.results_by_depth[&1]
            .iter()
            .map(|r| (r.url.as_str(), r.success))
            .collect();
        assert_eq!(
            depth_one,
            vec![("http://a.test/b", false), ("http://a.test/c", true)]
        );
    }

    #[test]
    fn test_abandoned_urls_in_snapshot() {
        let frontier = Frontier::new();
        frontier.seed("http://a.test/");
        assert!(claim_url(&frontier).is_some());
        frontier.abandon("http://a.test/");
        frontier.finish_task();

        let state = frontier.snapshot();
        assert!(state.abandoned.contains("http://a.test/"));
        assert!(state.unprocessed_urls().is_empty());
    }

    #[test]
    fn test_guard_finishes_task() {
        let frontier = Frontier::new();
        frontier.seed("http://a.test/");
        assert!(claim_url(&frontier).is_some());
        {
            let _guard = InFlightGuard::new(&frontier);
            assert_eq!(frontier.in_flight(), 1);
        }
        assert_eq!(frontier.in_flight(), 0);
    }

    #[test]
    fn test_concurrent_claims_never_share_a_url() {
        let frontier = Arc::new(Frontier::new());
        for round in 0..50 {
            for i in 0..20 {
                frontier.enqueue_child(format!("http://a.test/{}", i), round);
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let frontier = Arc::clone(&frontier);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Claim::Task(task) = frontier.try_claim() {
                        mine.push(task.url);
                        frontier.finish_task();
                    }
                    mine
                })
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        let before = all.len();
        all.dedup();

        assert_eq!(before, 20, "each URL claimed exactly once");
        assert_eq!(all.len(), 20);
        assert!(frontier.is_done());
    }

    #[tokio::test]
    async fn test_changed_wakes_on_enqueue() {
        let frontier = Arc::new(Frontier::new());

        let waiter = {
            let frontier = Arc::clone(&frontier);
            tokio::spawn(async move {
                let changed = frontier.changed();
                tokio::pin!(changed);
                changed.as_mut().enable();
                if frontier.queued() == 0 {
                    changed.await;
                }
                frontier.queued()
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        frontier.enqueue_child("http://a.test/", 0);

        let queued = tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken")
            .unwrap();
        assert_eq!(queued, 1);
    }
}
