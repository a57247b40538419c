//! Worker pool for the parallel root split.
//!
//! Threads come from a [`threadpool::ThreadPool`]. Each batch submitted with
//! [`WorkerPool::run_all`] gets its own result channel and the caller blocks
//! until every job of the batch has reported or died. A job that panics
//! yields `None`; the pool replaces the lost thread.

use std::thread;

use crossbeam_channel::unbounded;
use threadpool::ThreadPool;

/// A boxed task producing `T`.
pub type Task<T> = Box<dyn FnOnce() -> T + Send + 'static>;

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let pool = threadpool::Builder::new()
            .num_threads(size.max(1))
            .thread_name("search-worker".to_owned())
            .build();
        Self { pool }
    }

    /// One worker per available hardware thread.
    pub fn with_available_parallelism() -> Self {
        Self::new(default_threads())
    }

    pub fn size(&self) -> usize {
        self.pool.max_count()
    }

    /// Tasks that panicked over the lifetime of the pool.
    pub fn panic_count(&self) -> usize {
        self.pool.panic_count()
    }

    /// Run every task and wait for all of them. Results keep the order of
    /// `tasks`; a task that panicked gives `None`.
    pub fn run_all<T: Send + 'static>(&self, tasks: Vec<Task<T>>) -> Vec<Option<T>> {
        let mut results: Vec<Option<T>> = (0..tasks.len()).map(|_| None).collect();

        let (result_tx, result_rx) = unbounded::<(usize, T)>();
        for (index, task) in tasks.into_iter().enumerate() {
            let result_tx = result_tx.clone();
            self.pool.execute(move || {
                // A panic drops the sender before anything is sent.
                let _ = result_tx.send((index, task()));
            });
        }
        drop(result_tx);

        // Ends once every job has sent or unwound.
        for (index, value) in result_rx.iter() {
            results[index] = Some(value);
        }

        let missing = results.iter().filter(|r| r.is_none()).count();
        if missing > 0 {
            tracing::warn!(
                missing,
                panics = self.pool.panic_count(),
                "search tasks panicked; results dropped"
            );
        }
        results
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size())
            .field("active", &self.pool.active_count())
            .finish()
    }
}

/// Hardware parallelism, or 1 if it cannot be determined.
pub fn default_threads() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_task_order() {
        let pool = WorkerPool::new(3);
        let tasks: Vec<Task<usize>> = (0usize..10)
            .map(|i| Box::new(move || i * i) as Task<usize>)
            .collect();
        let results = pool.run_all(tasks);
        let expected: Vec<Option<usize>> = (0..10).map(|i| Some(i * i)).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_panicking_task_is_absent() {
        let pool = WorkerPool::new(2);
        let tasks: Vec<Task<u32>> = vec![
            Box::new(|| 1),
            Box::new(|| panic!("boom")),
            Box::new(|| 3),
        ];
        let results = pool.run_all(tasks);
        assert_eq!(results, vec![Some(1), None, Some(3)]);
        // The pool still works afterwards.
        let again = pool.run_all(vec![Box::new(|| 7u32) as Task<u32>]);
        assert_eq!(again, vec![Some(7)]);
    }

    #[test]
    fn test_empty_batch() {
        let pool = WorkerPool::new(1);
        let results: Vec<Option<()>> = pool.run_all(Vec::new());
        assert!(results.is_empty());
        assert_eq!(pool.size(), 1);
    }
}
