//! Crawl session - owner of the shared state and the page stream
//!
//! A session is constructed once per crawl. It owns the visited set, the engine
//! and the sending half of the page stream, runs the root invocation on its own
//! task, and closes the stream only after the root invocation is done.

use crate::config::{validate, Config};
use crate::crawler::engine::CrawlEngine;
use crate::crawler::fetcher::{build_http_client, Page, PageFetcher};
use crate::crawler::limiter::FetchLimiter;
use crate::output::{CrawlStats, CrawlSummary};
use crate::state::VisitedSet;
use crate::url::{host_of, normalize_url};
use crate::{CrawlError, UrlError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use url::Url;

/// A running crawl
///
/// Pages arrive through [`CrawlSession::next_page`] in completion order. The
/// stream ends (`None`) once the whole tree under the seed has been traversed.
pub struct CrawlSession {
    seed: Url,
    pages: Receiver<Page>,
    task: JoinHandle<Result<(), CrawlError>>,
    visited: Arc<VisitedSet>,
    stats: Arc<CrawlStats>,
    started_at: DateTime<Utc>,
    started: Instant,
}

/// Starts crawling from `seed` on the current tokio runtime
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from; its host bounds the crawl
///
/// # Returns
///
/// * `Ok(CrawlSession)` - The crawl is running
/// * `Err(CrawlError)` - Invalid configuration, malformed seed, or HTTP client setup failure
///
/// # Example
///
/// ```no_run
/// use hostwalk::{start_crawl, Config};
///
/// # async fn example() -> Result<(), hostwalk::CrawlError> {
/// let mut session = start_crawl(&Config::default(), "https://example.com/")?;
/// while let Some(page) = session.next_page().await {
///     println!("{} {}", page.url, page.title);
/// }
/// let summary = session.finish().await?;
/// println!("{}", summary);
/// # Ok(())
/// # }
/// ```
pub fn start_crawl(config: &Config, seed: &str) -> Result<CrawlSession, CrawlError> {
    validate(config)?;

    let seed = normalize_url(seed)?;
    let host = host_of(&seed).ok_or(CrawlError::MalformedUrl(UrlError::MissingHost))?;

    let client = build_http_client(config)?;
    let visited = Arc::new(VisitedSet::new());
    let stats = Arc::new(CrawlStats::new());

    let fetcher = PageFetcher::new(client, Arc::clone(&visited), host.clone());
    let engine = Arc::new(CrawlEngine::new(
        fetcher,
        FetchLimiter::new(config.crawler.max_concurrent_fetches),
        config.crawler.error_policy,
        Arc::clone(&stats),
    ));

    let (sender, pages) = mpsc::channel(config.crawler.channel_capacity);
    let depth = config.crawler.max_depth;

    tracing::info!(
        "Starting crawl of {} (host: {}, max depth: {})",
        seed,
        host,
        depth
    );

    let started_at = Utc::now();
    let started = Instant::now();

    let root = seed.clone();
    let task = tokio::spawn(async move {
        let result = engine.crawl(root, depth, 0, sender.clone()).await;
        // The root invocation is done; dropping the last sender ends the stream
        drop(sender);
        result
    });

    Ok(CrawlSession {
        seed,
        pages,
        task,
        visited,
        stats,
        started_at,
        started,
    })
}

impl CrawlSession {
    /// The canonical seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Number of URLs claimed so far
    pub fn urls_claimed(&self) -> usize {
        self.visited.len()
    }

    /// Receives the next completed page
    ///
    /// Returns `None` when the crawl is over, successfully or not; call
    /// [`CrawlSession::finish`] to learn which.
    pub async fn next_page(&mut self) -> Option<Page> {
        self.pages.recv().await
    }

    /// Waits for the crawl to end and returns its summary
    ///
    /// Pages not yet received are drained and discarded.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The crawl ran to completion
    /// * `Err(CrawlError)` - The crawl stopped on a fatal error
    pub async fn finish(mut self) -> Result<CrawlSummary, CrawlError> {
        while self.pages.recv().await.is_some() {}

        let result = self
            .task
            .await
            .map_err(|e| CrawlError::Task(e.to_string()))?;
        result?;

        Ok(self
            .stats
            .summarize(self.visited.len(), self.started_at, self.started.elapsed()))
    }
}

/// Crawls from `seed` and collects every page
///
/// Convenience wrapper around [`start_crawl`] for callers that do not need
/// streaming. No pages are returned if the crawl fails.
pub async fn collect_pages(config: &Config, seed: &str) -> Result<Vec<Page>, CrawlError> {
    let mut session = start_crawl(config, seed)?;

    let mut pages = Vec::new();
    while let Some(page) = session.next_page().await {
        pages.push(page);
    }

    session.finish().await?;
    Ok(pages)
}
