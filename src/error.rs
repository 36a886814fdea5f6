//! Error types for pool lifecycle, task outcomes, and the demo pipeline.

use std::io;

use thiserror::Error;

/// Errors surfaced synchronously by pool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The pool's stop flag is set; no further tasks are accepted.
    #[error("pool is stopped; new tasks are not accepted")]
    Stopped,
}

/// Errors delivered through a task's result handle.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task body panicked. The payload is captured when it is a
    /// `&str` or `String`, which covers `panic!` with a message.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The task was dropped without running, so no result will ever arrive.
    /// Normal pool operation drains every accepted task and never produces
    /// this variant.
    #[error("task was dropped before it produced a result")]
    Lost,
}

/// Errors from feeding an event store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Pool(#[from] PoolError),
}
