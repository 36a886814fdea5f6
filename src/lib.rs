//! # taskpool - Bounded, Resizable Thread Pool
//!
//! A generic task executor built on a fixed-but-resizable set of OS worker
//! threads sharing one bounded FIFO queue. Submitters receive a handle that
//! eventually holds the task's return value or the error that ended it.
//!
//! ## Architecture
//!
//! The pool is structured into four cooperating responsibilities:
//!
//! - **Task queue**: a FIFO buffer of ready-to-run closures, bounded by a
//!   configurable capacity
//! - **Worker lifecycle**: a dynamically sized set of long-running threads
//!   that grows immediately and shrinks cooperatively, tail-first
//! - **Backpressure**: submitters block while the queue is at capacity and
//!   are woken as space frees or the pool stops
//! - **In-flight tracking**: counts tasks accepted but not yet finished, so
//!   callers can wait for true completion rather than mere dequeuing
//!
//! On top of the pool sit thin log-processing collaborators: an
//! [`EventStore`] that parses browsing-log lines field by field, and an
//! [`EventFilter`] that counts stored events matching a pattern.
//!
//! ## Example
//!
//! ```
//! use taskpool::ThreadPool;
//!
//! let pool = ThreadPool::with_threads(4);
//!
//! let handle = pool.submit(|| 21 * 2).unwrap();
//! assert_eq!(handle.wait().unwrap(), 42);
//!
//! pool.wait_until_idle();
//! pool.shutdown();
//! ```

pub mod error;
pub mod event;
pub mod filter;
pub mod pool;
pub mod storage;
pub mod task;
mod worker;

pub use error::{PoolError, StoreError, TaskError};
pub use event::{BrowsingEvent, EventField};
pub use filter::EventFilter;
pub use pool::{default_pool_size, PoolConfig, ThreadPool, DEFAULT_MAX_QUEUE_SIZE};
pub use storage::EventStore;
pub use task::TaskHandle;
