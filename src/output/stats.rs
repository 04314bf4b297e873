//! Crawl statistics
//!
//! Counters are updated by every crawl task while the run is in flight and are
//! turned into a [`CrawlSummary`] once the root invocation finishes.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Live counters shared by all crawl tasks
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_emitted: AtomicUsize,
    links_discovered: AtomicUsize,
    failed_branches: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a page sent to the stream along with its number of links
    pub fn record_page(&self, links: usize) {
        self.pages_emitted.fetch_add(1, Ordering::Relaxed);
        self.links_discovered.fetch_add(links, Ordering::Relaxed);
    }

    /// Records a branch dropped after a fetch or parse failure
    pub fn record_failure(&self) {
        self.failed_branches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_emitted(&self) -> usize {
        self.pages_emitted.load(Ordering::Relaxed)
    }

    pub fn links_discovered(&self) -> usize {
        self.links_discovered.load(Ordering::Relaxed)
    }

    pub fn failed_branches(&self) -> usize {
        self.failed_branches.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a summary
    pub fn summarize(
        &self,
        urls_claimed: usize,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> CrawlSummary {
        CrawlSummary {
            pages_emitted: self.pages_emitted(),
            links_discovered: self.links_discovered(),
            failed_branches: self.failed_branches(),
            urls_claimed,
            started_at,
            finished_at: Utc::now(),
            elapsed,
        }
    }
}

/// Summary statistics for a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Pages delivered to the consumer
    pub pages_emitted: usize,

    /// Same-host links found across all emitted pages (counted per page)
    pub links_discovered: usize,

    /// Branches dropped after a fetch or parse failure
    pub failed_branches: usize,

    /// Distinct canonical URLs claimed for fetching
    pub urls_claimed: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Pages per second over the whole run
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_emitted as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crawl completed: {} pages, {} links, {} failed, {} URLs claimed in {:.2?} ({:.2} pages/sec)",
            self.pages_emitted,
            self.links_discovered,
            self.failed_branches,
            self.urls_claimed,
            self.elapsed,
            self.rate()
        )
    }
}
