//! Optional ceiling on in-flight HTTP requests
//!
//! The crawl fans out one task per link. By default nothing bounds that fan-out;
//! with a configured ceiling, each fetch waits for a semaphore permit first.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Gate in front of every network fetch
#[derive(Debug, Clone, Default)]
pub struct FetchLimiter {
    /// Global semaphore for limiting concurrent fetches; `None` means unbounded
    semaphore: Option<Arc<Semaphore>>,
}

impl FetchLimiter {
    /// Creates a limiter allowing `max_concurrent` fetches at once, or unbounded for `None`
    pub fn new(max_concurrent: Option<usize>) -> Self {
        Self {
            semaphore: max_concurrent.map(|max| Arc::new(Semaphore::new(max))),
        }
    }

    /// Creates a limiter that never waits
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Waits for a fetch slot
    ///
    /// The returned permit must be held for the duration of the network fetch
    /// only. `None` is returned when the limiter is unbounded.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.semaphore {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        }
    }

    /// Free fetch slots, or `None` when unbounded
    pub fn available(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }
}
