//! Crawl frontier: the deduplicating set of pending and visited URLs
//!
//! The frontier is the only crawl structure shared between concurrent
//! workers. It exposes two atomic operations, [`Frontier::enqueue`] and
//! [`Frontier::drain_pending_batch`], and never hands out references to its
//! internal sets.
//!
//! Invariants:
//! - a URL is in at most one of `pending` and `visited`
//! - once visited, a URL never becomes pending again

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
struct FrontierSets {
    /// Pending URLs in discovery order
    pending: Vec<Url>,

    /// Membership index for `pending`
    pending_index: HashSet<Url>,

    /// URLs already handed out for fetching
    visited: HashSet<Url>,
}

/// Thread-safe frontier keyed by requested (not canonical) URL
#[derive(Debug, Default)]
pub struct Frontier {
    sets: Mutex<FrontierSets>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier whose only pending URL is `seed`
    pub fn with_seed(seed: Url) -> Self {
        let frontier = Self::new();
        frontier.enqueue(seed);
        frontier
    }

    /// Adds `url` to the pending set unless it is already pending or visited
    ///
    /// This is the single de-duplication point of a crawl.
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly added
    pub fn enqueue(&self, url: Url) -> bool {
        let mut sets = self.lock();

        if sets.visited.contains(&url) || sets.pending_index.contains(&url) {
            return false;
        }

        sets.pending_index.insert(url.clone());
        sets.pending.push(url);
        true
    }

    /// Moves every pending URL to visited and returns them as the next wave
    ///
    /// An empty batch means the crawl is finished.
    pub fn drain_pending_batch(&self) -> Vec<Url> {
        let mut sets = self.lock();

        let batch = std::mem::take(&mut sets.pending);
        sets.pending_index.clear();
        sets.visited.extend(batch.iter().cloned());
        batch
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.lock().visited.contains(url)
    }

    pub fn is_pending(&self, url: &Url) -> bool {
        self.lock().pending_index.contains(url)
    }

    fn lock(&self) -> MutexGuard<'_, FrontierSets> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still holds consistent sets.
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
