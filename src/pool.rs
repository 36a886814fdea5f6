//! The bounded, dynamically resizable thread pool.
//!
//! All queue and worker-set state lives behind a single mutex; two condition
//! variables on that mutex serve the two waiting populations (idle workers,
//! backpressured producers). Completion tracking is an atomic counter with
//! its own mutex used only for the idle handoff, so finishing a task never
//! touches the queue lock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::task::{Task, TaskHandle};
use crate::worker::{self, Worker};

/// Queue bound applied when none is configured.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100_000;

/// Runtime-tunable pool configuration.
///
/// Both knobs can also be changed on a live pool via
/// [`ThreadPool::set_pool_size`] and [`ThreadPool::set_queue_capacity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Target number of worker threads.
    pub pool_size: usize,
    /// Queue occupancy at which submitters start blocking.
    pub max_queue_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
        }
    }
}

/// Default worker count: hardware parallelism, but at least two threads.
pub fn default_pool_size() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}

/// Everything guarded by the single queue lock.
pub(crate) struct PoolState {
    pub(crate) tasks: VecDeque<Task>,
    pub(crate) workers: Vec<Worker>,
    pub(crate) pool_size: usize,
    pub(crate) max_queue_size: usize,
    pub(crate) stop: bool,
}

/// State shared between the pool handle and every worker thread.
pub(crate) struct Shared {
    pub(crate) state: Mutex<PoolState>,
    /// Workers sleep here; also signalled on stop, shrink, and worker exit.
    pub(crate) consumers: Condvar,
    /// Backpressured submitters and empty-waiters sleep here.
    pub(crate) producers: Condvar,
    /// Tasks accepted but not yet finished. Always >= the queue length.
    pub(crate) in_flight: AtomicUsize,
    /// Lock and condvar used only for the in-flight-zero handoff.
    pub(crate) idle_lock: Mutex<()>,
    pub(crate) idle_cond: Condvar,
}

/// A FIFO pool of worker threads with bounded queuing and cooperative
/// resizing.
///
/// Submitters block while the queue is at capacity; workers block while it
/// is empty. Shrinking the pool never interrupts a running task: excess
/// workers retire themselves tail-first at their next idle check, which
/// keeps worker ids contiguous.
///
/// # Example
///
/// ```
/// use taskpool::ThreadPool;
///
/// let pool = ThreadPool::with_threads(4);
/// let handle = pool.submit(|| 2 + 2).unwrap();
/// assert_eq!(handle.wait().unwrap(), 4);
/// pool.shutdown();
/// ```
pub struct ThreadPool {
    shared: Arc<Shared>,
}

impl ThreadPool {
    /// Creates a pool with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates a pool with `threads` workers and the default queue bound.
    pub fn with_threads(threads: usize) -> Self {
        Self::with_config(PoolConfig {
            pool_size: threads,
            ..PoolConfig::default()
        })
    }

    /// Creates a pool from an explicit configuration.
    ///
    /// Both knobs are clamped to at least 1.
    pub fn with_config(config: PoolConfig) -> Self {
        let pool_size = config.pool_size.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                tasks: VecDeque::new(),
                workers: Vec::with_capacity(pool_size),
                pool_size,
                max_queue_size: config.max_queue_size.max(1),
                stop: false,
            }),
            consumers: Condvar::new(),
            producers: Condvar::new(),
            in_flight: AtomicUsize::new(0),
            idle_lock: Mutex::new(()),
            idle_cond: Condvar::new(),
        });

        {
            let mut state = shared.state.lock().unwrap();
            for id in 0..pool_size {
                let entry = worker::spawn(id, Arc::clone(&shared));
                state.workers.push(entry);
            }
        }

        ThreadPool { shared }
    }

    /// Submits a closure for execution and returns a handle to its outcome.
    ///
    /// Blocks cooperatively while the queue is at capacity. Once space is
    /// available the task is appended at the tail and exactly one idle
    /// worker is woken.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Stopped`] if the pool has stopped, including
    /// when it stops while this call is blocked on backpressure.
    pub fn submit<F, T>(&self, work: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (task, handle) = Task::new(work);

        let mut state = self.shared.state.lock().unwrap();
        while state.tasks.len() >= state.max_queue_size && !state.stop {
            state = self.shared.producers.wait(state).unwrap();
        }
        if state.stop {
            return Err(PoolError::Stopped);
        }

        state.tasks.push_back(task);
        self.shared.in_flight.fetch_add(1, Ordering::Relaxed);
        self.shared.consumers.notify_one();
        Ok(handle)
    }

    /// Blocks until no task remains waiting in the queue.
    ///
    /// Tasks may still be executing when this returns; use
    /// [`wait_until_idle`](Self::wait_until_idle) as the barrier before
    /// reading results.
    pub fn wait_until_empty(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while !state.tasks.is_empty() {
            state = self.shared.producers.wait(state).unwrap();
        }
    }

    /// Blocks until every accepted task has finished executing and resolved
    /// its handle.
    pub fn wait_until_idle(&self) {
        let mut guard = self.shared.idle_lock.lock().unwrap();
        while self.shared.in_flight.load(Ordering::Acquire) != 0 {
            guard = self.shared.idle_cond.wait(guard).unwrap();
        }
    }

    /// Changes the queue bound for future submissions (clamped to >= 1).
    ///
    /// Raising the bound wakes producers currently blocked on backpressure.
    /// Lowering it never evicts queued tasks. No-op once the pool stopped.
    pub fn set_queue_capacity(&self, limit: usize) {
        let mut state = self.shared.state.lock().unwrap();
        if state.stop {
            return;
        }
        let old_limit = state.max_queue_size;
        state.max_queue_size = limit.max(1);
        tracing::debug!(old_limit, new_limit = state.max_queue_size, "queue capacity changed");
        if old_limit < state.max_queue_size {
            self.shared.producers.notify_all();
        }
    }

    /// Changes the target worker count (clamped to >= 1).
    ///
    /// Growing spawns workers immediately. Shrinking is cooperative: excess
    /// workers notice the lowered target at their next idle check and exit
    /// tail-first, one at a time, without interrupting running tasks.
    /// No-op once the pool stopped.
    pub fn set_pool_size(&self, size: usize) {
        let size = size.max(1);
        let mut state = self.shared.state.lock().unwrap();
        if state.stop {
            return;
        }
        let old_size = state.workers.len();
        state.pool_size = size;
        tracing::debug!(old_size, new_size = size, "pool size changed");
        if size > old_size {
            for id in old_size..size {
                let entry = worker::spawn(id, Arc::clone(&self.shared));
                state.workers.push(entry);
            }
        } else if size < old_size {
            self.shared.consumers.notify_all();
        }
    }

    /// Number of tasks currently waiting in the queue.
    pub fn queued_tasks(&self) -> usize {
        self.shared.state.lock().unwrap().tasks.len()
    }

    /// Number of tasks accepted but not yet finished (superset of queued).
    pub fn in_flight(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.shared.state.lock().unwrap().workers.len()
    }

    /// Target worker count the live set converges to.
    pub fn target_pool_size(&self) -> usize {
        self.shared.state.lock().unwrap().pool_size
    }

    /// Whether the stop flag has been set.
    pub fn is_stopped(&self) -> bool {
        self.shared.state.lock().unwrap().stop
    }

    /// Stops intake and blocks until the queue has drained and every worker
    /// has exited. In-flight tasks are never cancelled.
    ///
    /// Subsequent submissions fail with [`PoolError::Stopped`]. Producers
    /// blocked on backpressure are woken so they can fail fast. Safe to call
    /// more than once.
    pub fn close(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if !state.stop {
            tracing::debug!(
                queued = state.tasks.len(),
                workers = state.workers.len(),
                "pool closing"
            );
            state.stop = true;
            state.pool_size = 0;
            self.shared.consumers.notify_all();
            self.shared.producers.notify_all();
        }
        while !state.workers.is_empty() {
            state = self.shared.consumers.wait(state).unwrap();
        }
        debug_assert_eq!(self.shared.in_flight.load(Ordering::Acquire), 0);
    }

    /// Consuming teardown; equivalent to [`close`](Self::close) followed by
    /// dropping the pool.
    pub fn shutdown(self) {
        self.close();
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        ThreadPool::new()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::error::TaskError;

    #[test]
    fn test_pool_creation() {
        let pool = ThreadPool::with_threads(4);
        assert_eq!(pool.worker_count(), 4);
        assert_eq!(pool.target_pool_size(), 4);
        pool.shutdown();
    }

    #[test]
    fn test_zero_threads_clamped_to_one() {
        let pool = ThreadPool::with_threads(0);
        assert_eq!(pool.worker_count(), 1);
        pool.shutdown();
    }

    #[test]
    fn test_submit_returns_value() {
        let pool = ThreadPool::with_threads(2);
        let handle = pool.submit(|| 6 * 7).unwrap();
        assert_eq!(handle.wait().unwrap(), 42);
        pool.shutdown();
    }

    #[test]
    fn test_many_tasks_complete() {
        let pool = ThreadPool::with_threads(4);
        let executed = Arc::new(AtomicUsize::new(0));

        let num_tasks = 100;
        for _ in 0..num_tasks {
            let executed = executed.clone();
            pool.submit(move || {
                executed.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.wait_until_idle();
        assert_eq!(executed.load(Ordering::SeqCst), num_tasks);
        assert_eq!(pool.in_flight(), 0);
        pool.shutdown();
    }

    #[test]
    fn test_submit_after_close_fails_fast() {
        let pool = ThreadPool::with_threads(2);
        pool.close();
        assert!(pool.is_stopped());
        assert_eq!(pool.submit(|| ()).unwrap_err(), PoolError::Stopped);
    }

    #[test]
    fn test_wait_until_empty_lets_tasks_still_run() {
        let pool = ThreadPool::with_threads(1);
        let finished = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let finished = finished.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(5));
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.wait_until_empty();
        assert_eq!(pool.queued_tasks(), 0);

        pool.wait_until_idle();
        assert_eq!(finished.load(Ordering::SeqCst), 5);
        pool.shutdown();
    }

    #[test]
    fn test_resize_convergence() {
        let pool = ThreadPool::with_threads(4);

        pool.set_pool_size(1);
        let deadline = Instant::now() + Duration::from_secs(5);
        while pool.worker_count() != 1 {
            assert!(Instant::now() < deadline, "shrink did not converge");
            thread::sleep(Duration::from_millis(5));
        }

        pool.set_pool_size(3);
        assert_eq!(pool.worker_count(), 3);
        assert_eq!(pool.target_pool_size(), 3);

        // The regrown pool still executes work.
        let handle = pool.submit(|| 1).unwrap();
        assert_eq!(handle.wait().unwrap(), 1);
        pool.shutdown();
    }

    #[test]
    fn test_panicking_task_resolves_handle() {
        let pool = ThreadPool::with_threads(1);
        let handle = pool.submit(|| -> () { panic!("task failure") }).unwrap();
        match handle.wait() {
            Err(TaskError::Panicked(message)) => assert_eq!(message, "task failure"),
            other => panic!("expected panic outcome, got {:?}", other),
        }
        pool.wait_until_idle();
        assert_eq!(pool.in_flight(), 0);
        pool.shutdown();
    }
}
