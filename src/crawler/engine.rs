//! Crawl engine - recursive, depth-bounded traversal
//!
//! Each invocation fetches one URL, emits the page, then starts one sub-crawl per
//! extracted link and waits for all of them before it finishes. Sub-crawls run as
//! separate tasks in a `JoinSet`, so no child outlives its parent invocation.

use crate::config::ErrorPolicy;
use crate::crawler::fetcher::{Fetcher, Page, PageFetcher};
use crate::crawler::limiter::FetchLimiter;
use crate::output::CrawlStats;
use crate::state::InvocationState;
use crate::CrawlError;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinSet;
use url::Url;

/// Recursive crawler shared by every invocation of one crawl run
///
/// Generic over the page source so traversal can run against any [`Fetcher`].
pub struct CrawlEngine<F = PageFetcher> {
    fetcher: F,
    limiter: FetchLimiter,
    policy: ErrorPolicy,
    stats: Arc<CrawlStats>,
}

impl<F: Fetcher> CrawlEngine<F> {
    /// Creates a new engine
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher bound to the crawl's visited set and host
    /// * `limiter` - Optional ceiling on in-flight fetches
    /// * `policy` - What a failed page does to the rest of the crawl
    /// * `stats` - Counters updated as pages are emitted or dropped
    pub fn new(
        fetcher: F,
        limiter: FetchLimiter,
        policy: ErrorPolicy,
        stats: Arc<CrawlStats>,
    ) -> Self {
        Self {
            fetcher,
            limiter,
            policy,
            stats,
        }
    }

    /// Crawls `url` and everything reachable from it within `depth` hops
    ///
    /// # Flow
    ///
    /// 1. Skip when the depth budget is spent or the URL is already visited
    /// 2. Fetch the page (the fetcher makes the authoritative claim)
    /// 3. Send the page to `pages`, waiting if the consumer is behind
    /// 4. Start one sub-crawl per link with `depth - 1`
    /// 5. Wait for every sub-crawl to finish
    ///
    /// `level` is the page's distance from the seed and is only used for
    /// presentation. The engine never closes `pages`; its owner does.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - This subtree is fully traversed
    /// * `Err(CrawlError)` - A fatal error; under [`ErrorPolicy::Abort`] this
    ///   includes fetch and parse failures anywhere in the subtree
    pub fn crawl(
        self: Arc<Self>,
        url: Url,
        depth: u32,
        level: usize,
        pages: Sender<Page>,
    ) -> BoxFuture<'static, Result<(), CrawlError>> {
        Box::pin(async move {
            let mut invocation = Invocation::new(&url, depth);
            invocation.advance(InvocationState::Claiming);

            if depth == 0 || self.fetcher.is_processed(&url) {
                invocation.advance(InvocationState::Skipped);
                return Ok(());
            }

            invocation.advance(InvocationState::Fetching);
            let mut page = match self.fetch_page(&url).await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    invocation.advance(InvocationState::Skipped);
                    return Ok(());
                }
                Err(e) => {
                    invocation.advance(InvocationState::Failed);
                    return Err(e);
                }
            };

            invocation.advance(InvocationState::Emitting);
            page.depth = level;
            let links = page.links.clone();
            self.stats.record_page(links.len());
            if pages.send(page).await.is_err() {
                invocation.advance(InvocationState::Failed);
                return Err(CrawlError::StreamClosed);
            }

            invocation.advance(InvocationState::Spawning);
            let mut children = JoinSet::new();
            // children of a depth-1 page would all be skipped
            if depth > 1 {
                for link in links {
                    if self.fetcher.is_processed(&link) {
                        continue;
                    }
                    let child = Arc::clone(&self);
                    children.spawn(child.crawl(link, depth - 1, level + 1, pages.clone()));
                }
            }

            invocation.advance(InvocationState::Joining);
            while let Some(joined) = children.join_next().await {
                let result = match joined {
                    Ok(result) => result,
                    Err(e) => Err(CrawlError::Task(e.to_string())),
                };
                if let Err(e) = result {
                    // Dropping `children` cancels the remaining siblings
                    invocation.advance(InvocationState::Failed);
                    return Err(e);
                }
            }

            invocation.advance(InvocationState::Done);
            Ok(())
        })
    }

    /// Fetches a page, applying the error policy
    ///
    /// Returns `Ok(None)` when the branch should end quietly: the URL was
    /// claimed by another invocation, or the page failed under
    /// [`ErrorPolicy::SkipBranch`].
    async fn fetch_page(&self, url: &Url) -> Result<Option<Page>, CrawlError> {
        let result = {
            if let Some(0) = self.limiter.available() {
                tracing::trace!("Waiting for a fetch slot for {}", url);
            }
            let _permit = self.limiter.acquire().await;
            self.fetcher.fetch(url).await
        };

        match result {
            Ok(page) => Ok(Some(page)),
            Err(CrawlError::AlreadyVisited { .. }) => Ok(None),
            Err(CrawlError::MalformedUrl(e)) => {
                tracing::debug!("Skipping malformed URL {}: {}", url, e);
                Ok(None)
            }
            Err(e) if e.is_branch_local() && self.policy == ErrorPolicy::SkipBranch => {
                tracing::warn!("Skipping {}: {}", url, e);
                self.stats.record_failure();
                Ok(None)
            }
            Err(e) => {
                if e.is_branch_local() {
                    self.stats.record_failure();
                }
                Err(e)
            }
        }
    }
}

/// Tracks one invocation through its lifecycle for trace logging
struct Invocation {
    url: String,
    depth: u32,
    state: InvocationState,
}

impl Invocation {
    fn new(url: &Url, depth: u32) -> Self {
        Self {
            url: url.to_string(),
            depth,
            state: InvocationState::Pending,
        }
    }

    fn advance(&mut self, next: InvocationState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid invocation transition {} -> {}",
            self.state,
            next
        );
        if next.is_terminal() {
            tracing::trace!(url = %self.url, depth = self.depth, "invocation {}", next);
        } else {
            tracing::trace!(url = %self.url, depth = self.depth, "{} -> {}", self.state, next);
        }
        self.state = next;
    }
}
