//! Shared storage fed by per-field parse tasks.
//!
//! [`EventStore`] reads a browsing log line by line and submits one parse
//! task per field per line to its thread pool. Each task matches its field's
//! `key: value` pattern and appends a record to the shared vector under a
//! lock. The store exercises both drain primitives: `wait_until_empty` once
//! all lines are submitted, then `wait_until_idle` before results are read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex};

use regex::Regex;

use crate::error::{PoolError, StoreError};
use crate::event::{BrowsingEvent, EventField};
use crate::pool::ThreadPool;

/// Accumulates browsing events parsed concurrently on a thread pool.
pub struct EventStore {
    pool: ThreadPool,
    events: Arc<Mutex<Vec<BrowsingEvent>>>,
    patterns: [(EventField, Arc<Regex>); 3],
}

impl EventStore {
    /// Creates a store backed by a default-sized pool.
    pub fn new() -> Self {
        Self::with_pool(ThreadPool::new())
    }

    /// Creates a store that parses on the given pool.
    pub fn with_pool(pool: ThreadPool) -> Self {
        let patterns = EventField::ALL.map(|field| {
            let regex = Regex::new(&format!("{}: (.*)", field.key()))
                .expect("field patterns are valid regexes");
            (field, Arc::new(regex))
        });
        EventStore {
            pool,
            events: Arc::new(Mutex::new(Vec::new())),
            patterns,
        }
    }

    /// Reads a browsing log, submitting one parse task per field per line,
    /// and returns once every accepted task has finished storing its record.
    pub fn read_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let file = File::open(path)?;
        for line in BufReader::new(file).lines() {
            let line = line?;
            self.insert_line(&line)?;
        }

        self.pool.wait_until_empty();
        self.pool.wait_until_idle();
        Ok(())
    }

    /// Submits one parse task per field for `line`.
    ///
    /// Results land in the store asynchronously; callers that need them must
    /// first drain the pool (as [`read_from_file`](Self::read_from_file)
    /// does).
    pub fn insert_line(&self, line: &str) -> Result<(), PoolError> {
        for (field, regex) in &self.patterns {
            let field = *field;
            let regex = Arc::clone(regex);
            let line = line.to_owned();
            let events = Arc::clone(&self.events);
            self.pool.submit(move || {
                if let Some(captures) = regex.captures(&line) {
                    let value = captures[1].to_owned();
                    if !value.is_empty() {
                        events.lock().unwrap().push(field.into_event(value));
                    }
                }
            })?;
        }
        Ok(())
    }

    /// Snapshot of the stored events.
    ///
    /// Call [`ThreadPool::wait_until_idle`] (or use
    /// [`read_from_file`](Self::read_from_file), which drains internally)
    /// before reading, otherwise parse tasks may still be appending.
    pub fn events(&self) -> Vec<BrowsingEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether no event has been stored.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// The pool parse tasks run on.
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}

impl Default for EventStore {
    fn default() -> Self {
        EventStore::new()
    }
}
