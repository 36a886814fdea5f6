//! Pattern filter over stored events.
//!
//! [`EventFilter`] submits one match task per stored record and reads the
//! aggregate counter only once the pool is idle, which is the barrier the
//! pool guarantees for aggregate results.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use regex::Regex;

use crate::error::PoolError;
use crate::pool::ThreadPool;
use crate::storage::EventStore;

/// Counts browsing events whose URL matches a pattern.
pub struct EventFilter {
    pool: ThreadPool,
    regex: Arc<Regex>,
}

impl EventFilter {
    /// Compiles `pattern` and creates a filter with its own default pool.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Self::with_pool(pattern, ThreadPool::new())
    }

    /// Compiles `pattern` and creates a filter that matches on `pool`.
    pub fn with_pool(pattern: &str, pool: ThreadPool) -> Result<Self, regex::Error> {
        let regex = Arc::new(Regex::new(pattern)?);
        Ok(EventFilter { pool, regex })
    }

    /// Counts the stored events whose URL matches the filter pattern.
    ///
    /// One task is submitted per event; the count is read only after the
    /// pool has gone idle, so it reflects every submitted match task.
    pub fn count_matches(&self, store: &EventStore) -> Result<usize, PoolError> {
        let events = Arc::new(store.events());
        let matched = Arc::new(AtomicUsize::new(0));

        for index in 0..events.len() {
            let events = Arc::clone(&events);
            let regex = Arc::clone(&self.regex);
            let matched = Arc::clone(&matched);
            self.pool.submit(move || {
                if regex.is_match(&events[index].url) {
                    matched.fetch_add(1, Ordering::Relaxed);
                }
            })?;
        }

        self.pool.wait_until_empty();
        self.pool.wait_until_idle();
        Ok(matched.load(Ordering::Acquire))
    }

    /// The pool match tasks run on.
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}
