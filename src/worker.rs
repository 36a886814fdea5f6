//! Worker identity and the worker run loop.
//!
//! Workers retire in strict reverse-index order: only the thread whose id is
//! the current tail of the worker set may remove itself, whether the cause
//! is shutdown or a lowered pool size. Everyone else re-checks until they
//! become the tail. That keeps worker ids contiguous without ever
//! reshuffling live entries.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::pool::Shared;

/// One entry in the pool's worker set.
pub(crate) struct Worker {
    id: usize,
    // The exiting worker pops its own entry, so the pool never joins this
    // handle; dropping it detaches the thread.
    _handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn id(&self) -> usize {
        self.id
    }
}

/// Spawns worker `id`. Called with the pool state lock held so the new
/// entry lands at index `id` of the worker set.
pub(crate) fn spawn(id: usize, shared: Arc<Shared>) -> Worker {
    let handle = thread::Builder::new()
        .name(format!("taskpool-worker-{id}"))
        .spawn(move || run_loop(id, shared))
        .expect("failed to spawn worker thread");
    tracing::debug!(worker = id, "worker spawned");
    Worker {
        id,
        _handle: handle,
    }
}

/// The worker loop. Each iteration evaluates one queue-state check under the
/// lock and either exits, dequeues, or goes back to sleep.
fn run_loop(id: usize, shared: Arc<Shared>) {
    loop {
        let (task, wake_producers) = {
            let mut state = shared.state.lock().unwrap();
            state = shared
                .consumers
                .wait_while(state, |s| {
                    !s.stop && s.tasks.is_empty() && s.pool_size >= id + 1
                })
                .unwrap();

            let draining = state.stop && state.tasks.is_empty();
            let excess = !state.stop && state.pool_size < id + 1;
            if draining || excess {
                if state.workers.last().map(Worker::id) == Some(id) {
                    state.workers.pop();
                    // Wake the next excess worker and anyone waiting for
                    // the worker set to empty out.
                    shared.consumers.notify_all();
                    tracing::debug!(worker = id, remaining = state.workers.len(), "worker exited");
                    return;
                }
                // Not the tail yet; re-check once the tail has exited.
                continue;
            }

            let Some(task) = state.tasks.pop_front() else {
                continue;
            };
            let was_at_capacity = state.tasks.len() + 1 == state.max_queue_size;
            (task, was_at_capacity || state.tasks.is_empty())
        };

        // Decremented when the guard drops, after the task has run to
        // completion or panicked.
        let _in_flight = InFlightGuard { shared: &shared };

        if wake_producers {
            shared.producers.notify_all();
        }

        task.run();
    }
}

/// Decrements the in-flight counter on drop and wakes idle-waiters on the
/// transition to zero.
struct InFlightGuard<'a> {
    shared: &'a Shared,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let prev = self.shared.in_flight.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "in-flight counter underflow");
        if prev == 1 {
            // Taking the idle lock orders this wakeup against a waiter that
            // has checked the counter but not yet gone to sleep.
            let _guard = self.shared.idle_lock.lock().unwrap();
            self.shared.idle_cond.notify_all();
        }
    }
}
