//! Task definitions and result handles.
//!
//! A task pairs a boxed closure with a single-slot result channel. The
//! submitter keeps the [`TaskHandle`] end while the closure carries the
//! sender, so the return value (or the panic) of the body reaches exactly
//! one consumer, exactly once.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use crate::error::TaskError;

/// A unit of work queued for execution by a worker thread.
///
/// The result delivery happens inside the boxed closure, never in the worker
/// loop, so the worker needs no knowledge of the task's return type.
pub(crate) struct Task {
    work: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    /// Wraps `work` so that its return value, or the message of the panic
    /// that ended it, is sent into the paired handle.
    pub(crate) fn new<F, T>(work: F) -> (Self, TaskHandle<T>)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = bounded(1);
        let work = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(work))
                .map_err(|payload| TaskError::Panicked(panic_message(payload.as_ref())));
            // The handle may already be gone; the outcome is discarded then.
            let _ = sender.send(outcome);
        });
        (Task { work }, TaskHandle { receiver })
    }

    /// Runs the task body. Panics are caught inside the closure, so this
    /// never unwinds into the caller.
    pub(crate) fn run(self) {
        (self.work)();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}

/// Caller-held receiver for one task's outcome.
///
/// The handle resolves exactly once: either the task's return value or the
/// [`TaskError`] that ended it. Dropping the handle is allowed; the task
/// still runs and its outcome is discarded.
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes and yields its outcome.
    pub fn wait(self) -> Result<T, TaskError> {
        self.receiver.recv().unwrap_or(Err(TaskError::Lost))
    }

    /// Non-blocking probe; `None` while the task has not finished yet.
    pub fn try_wait(&self) -> Option<Result<T, TaskError>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Lost)),
        }
    }
}

impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}
