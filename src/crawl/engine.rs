// src/crawl/engine.rs
// =============================================================================
// The crawl engine: seeds a Frontier, runs N workers over it, waits for all
// of them and hands back a read-only FinalState.
//
// A single failed page never fails the crawl. The only errors run() returns
// are about the inputs (bad seed URL, unusable config).
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, instrument, warn, Instrument};

use super::frontier::Frontier;
use super::state::FinalState;
use super::worker::{Collaborators, CrawlWorker, WorkerStats};
use crate::config::CrawlConfig;
use crate::error::Result;
use crate::page::{
    Fetcher, HtmlLinkExtractor, HttpFetcher, LinkExtractor, PageUrl, PolicyResolver, UrlResolver,
};

pub struct CrawlEngine {
    config: CrawlConfig,
    collaborators: Collaborators,
    cancel: CancellationToken,
}

impl CrawlEngine {
    /// Engine with a custom fetcher and the default extractor and resolver.
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let collaborators = Collaborators {
            fetcher,
            extractor: Arc::new(HtmlLinkExtractor::new()),
            resolver: Arc::new(PolicyResolver::new(config.resolve_policy)),
        };
        Self {
            config,
            collaborators,
            cancel: CancellationToken::new(),
        }
    }

    /// Engine that fetches over HTTP.
    pub fn from_config(config: CrawlConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.collaborators.extractor = extractor;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.collaborators.resolver = resolver;
        self
    }

    /// Lets the caller stop the crawl early by cancelling `token`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls from `seed` until the frontier is exhausted (or the crawl is cancelled).
    #[instrument(skip(self), fields(max_depth = self.config.max_depth, workers = self.config.workers))]
    pub async fn run(&self, seed: &str) -> Result<FinalState> {
        self.config.validate()?;
        let seed = PageUrl::parse(seed)?;

        let frontier = Arc::new(Frontier::new());
        frontier.seed(seed.to_string());

        // Cancelling the child (deadline) leaves the caller's token alone
        let cancel = self.cancel.child_token();
        let deadline = self.config.deadline.map(|limit| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                warn!(?limit, "crawl deadline reached, cancelling");
                cancel.cancel();
            })
        });

        info!(seed = %seed, "starting crawl");

        let handles: Vec<_> = (1..=self.config.workers)
            .map(|id| {
                let worker = CrawlWorker::new(
                    id,
                    Arc::clone(&frontier),
                    self.collaborators.clone(),
                    self.config.max_depth,
                    self.config.poll_interval,
                    cancel.clone(),
                );
                tokio::spawn(worker.run().instrument(info_span!("worker", id)))
            })
            .collect();

        let mut totals = WorkerStats::default();
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(stats) => totals += stats,
                Err(e) => error!(worker = index + 1, error = %e, "crawl worker crashed"),
            }
        }

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        let mut state = frontier.snapshot();
        state.cancelled = cancel.is_cancelled();

        info!(
            visited = state.visited.len(),
            fetched = totals.fetched,
            failed = totals.failed,
            depth_exceeded = totals.depth_exceeded,
            cancelled = state.cancelled,
            "crawl finished"
        );

        Ok(state)
    }
}

/// Crawls `start_url` over HTTP with the given configuration.
pub async fn crawl_website(start_url: &str, config: CrawlConfig) -> Result<FinalState> {
    CrawlEngine::from_config(config)?.run(start_url).await
}
