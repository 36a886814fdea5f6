use std::sync::{Arc, Mutex};

use taskpool::{PoolConfig, ThreadPool};

/// With a single worker, execution order equals dequeue order, so this
/// observes the queue's FIFO guarantee directly.
#[test]
fn test_single_worker_runs_tasks_in_submission_order() {
    let pool = ThreadPool::with_config(PoolConfig {
        pool_size: 1,
        max_queue_size: 1000,
    });
    let order = Arc::new(Mutex::new(Vec::new()));

    let num_tasks = 100;
    for i in 0..num_tasks {
        let order = order.clone();
        pool.submit(move || {
            order.lock().unwrap().push(i);
        })
        .unwrap();
    }

    pool.wait_until_idle();
    let order = order.lock().unwrap();
    assert_eq!(*order, (0..num_tasks).collect::<Vec<_>>());
}

/// With several workers, every task still runs exactly once even though
/// completion order is unspecified.
#[test]
fn test_concurrent_workers_lose_no_tasks() {
    let pool = ThreadPool::with_threads(4);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let num_tasks = 500;
    for i in 0..num_tasks {
        let seen = seen.clone();
        pool.submit(move || {
            seen.lock().unwrap().push(i);
        })
        .unwrap();
    }

    pool.wait_until_idle();
    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..num_tasks).collect::<Vec<_>>());
}
