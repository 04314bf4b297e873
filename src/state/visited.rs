//! Shared set of claimed URLs
//!
//! Every fetcher consults the same `VisitedSet` so that each canonical URL is
//! fetched at most once per crawl run.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe set of canonical URL keys with insert-if-absent semantics
///
/// Keys are never removed during a run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: Mutex<BTreeSet<String>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims `key`
    ///
    /// # Returns
    ///
    /// * `true` - The key was absent and now belongs to the caller, who must fetch it
    /// * `false` - The key was already claimed; the caller must not fetch it
    pub fn try_claim(&self, key: &str) -> bool {
        let mut keys = self.lock();
        if keys.contains(key) {
            return false;
        }
        keys.insert(key.to_string())
    }

    /// Returns true if `key` has been claimed
    ///
    /// This is a read-only pre-check; only [`VisitedSet::try_claim`] decides ownership.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Number of claimed keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The set only ever grows, so a guard poisoned by a panicking holder still
    // protects consistent data.
    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.keys
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
