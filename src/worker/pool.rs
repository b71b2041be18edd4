//! Process-wide background worker pool.
//!
//! A fixed set of named threads pulls boxed jobs from one shared unbounded
//! queue. Submission never blocks the caller. A job that panics is contained
//! so its thread keeps serving the queue.

use crate::domain::{LoadError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::thread;

/// Thread count used when the global pool is created implicitly.
pub const DEFAULT_WORKER_THREADS: usize = 4;

type Job = Box<dyn FnOnce() + Send + 'static>;

static GLOBAL_POOL: OnceLock<WorkerPool> = OnceLock::new();

/// Handle to a pool of worker threads.
///
/// Cloning shares the same queue and threads. The threads exit once every
/// handle is dropped, which never happens for the [global](Self::global) pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    sender: Sender<Job>,
    threads: usize,
}

impl WorkerPool {
    /// Spawns a dedicated pool of `threads` workers (at least one).
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Io`](crate::ShelfdeskError::Io) if a thread
    /// cannot be spawned.
    pub fn new(threads: usize) -> Result<Self> {
        Self::spawn("shelfdesk-worker", threads)
    }

    /// Returns the process-wide pool, creating it with
    /// [`DEFAULT_WORKER_THREADS`] on first use.
    ///
    /// # Errors
    ///
    /// Returns an error only if the pool does not exist yet and its threads
    /// cannot be spawned.
    pub fn global() -> Result<&'static Self> {
        Self::install_global(DEFAULT_WORKER_THREADS)
    }

    /// Creates the process-wide pool with `threads` workers.
    ///
    /// Has no effect if the global pool already exists; the existing pool is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool's threads cannot be spawned.
    pub fn install_global(threads: usize) -> Result<&'static Self> {
        if let Some(pool) = GLOBAL_POOL.get() {
            return Ok(pool);
        }
        let pool = Self::spawn("shelfdesk-pool", threads)?;
        Ok(GLOBAL_POOL.get_or_init(|| pool))
    }

    fn spawn(prefix: &str, threads: usize) -> Result<Self> {
        let threads = threads.max(1);
        let (sender, receiver) = unbounded::<Job>();

        for index in 0..threads {
            let receiver = receiver.clone();
            thread::Builder::new()
                .name(format!("{prefix}-{index}"))
                .spawn(move || worker_main(&receiver))?;
        }

        tracing::debug!(threads, prefix, "worker pool started");
        Ok(Self { sender, threads })
    }

    /// Queues `job` for execution on a worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::PoolUnavailable`] if every worker thread has exited.
    pub fn execute<F>(&self, job: F) -> std::result::Result<(), LoadError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Box::new(job))
            .map_err(|_| LoadError::PoolUnavailable)
    }

    /// Number of worker threads serving this pool.
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Number of queued jobs not yet picked up by a worker.
    pub fn queued(&self) -> usize {
        self.sender.len()
    }
}

fn worker_main(receiver: &Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(
                thread = thread::current().name().unwrap_or("worker"),
                "worker job panicked"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn jobs_run_on_named_worker_threads() {
        let pool = WorkerPool::new(2).unwrap();
        let (tx, rx) = crossbeam_channel::bounded(1);
        pool.execute(move || {
            let name = thread::current().name().map(String::from);
            tx.send(name).unwrap();
        })
        .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert!(name.starts_with("shelfdesk-worker-"), "{name}");
    }

    #[test]
    fn panicking_job_does_not_kill_the_pool() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(|| panic!("boom")).unwrap();

        let (tx, rx) = crossbeam_channel::bounded(1);
        pool.execute(move || tx.send(42).unwrap()).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[test]
    fn zero_threads_is_clamped_to_one() {
        let pool = WorkerPool::new(0).unwrap();
        assert_eq!(pool.threads(), 1);
    }

    #[test]
    fn global_pool_is_shared() {
        let first = WorkerPool::global().unwrap();
        let second = WorkerPool::install_global(16).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
