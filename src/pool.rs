//! Bounded worker pool with pollable progress.
//!
//! Jobs are blocking closures run on tokio's blocking thread pool, at most
//! `workers` at a time. Submission returns a [`BatchHandle`] immediately;
//! callers either poll [`BatchHandle::progress`] on a timer or await
//! [`BatchHandle::join`] for the results in submission order.

use crate::imaging::JobResult;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Default number of concurrent jobs
pub const DEFAULT_WORKERS: usize = 4;

/// Default polling period for progress reporting
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default worker count: [`DEFAULT_WORKERS`] capped by the CPU count.
pub fn default_workers() -> usize {
    DEFAULT_WORKERS.min(num_cpus::get()).max(1)
}

/// Snapshot of a batch's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Jobs that finished successfully
    pub completed: usize,
    /// Jobs that failed or panicked
    pub failed: usize,
    /// Jobs submitted
    pub total: usize,
}

impl Progress {
    /// Jobs finished either way
    pub fn finished(&self) -> usize {
        self.completed + self.failed
    }

    /// Whether every job has finished
    pub fn done(&self) -> bool {
        self.finished() >= self.total
    }
}

#[derive(Debug, Default)]
struct Tracker {
    completed: AtomicUsize,
    failed: AtomicUsize,
    total: usize,
}

impl Tracker {
    fn record(&self, result: &JobResult) {
        if result.success {
            self.completed.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn snapshot(&self) -> Progress {
        Progress {
            completed: self.completed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            total: self.total,
        }
    }
}

/// Pool limiting how many blocking jobs run at once.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

impl WorkerPool {
    /// Pool running at most `workers` jobs concurrently (at least one).
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Concurrency limit
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submit every job and return without waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_all<F>(&self, jobs: Vec<F>) -> BatchHandle
    where
        F: FnOnce() -> JobResult + Send + 'static,
    {
        let tracker = Arc::new(Tracker {
            total: jobs.len(),
            ..Tracker::default()
        });
        log::debug!(
            "Submitting {} jobs to {} workers",
            jobs.len(),
            self.workers
        );

        let handles = jobs
            .into_iter()
            .map(|job| {
                let permits = Arc::clone(&self.permits);
                let tracker = Arc::clone(&tracker);
                tokio::spawn(async move {
                    let result = match permits.acquire_owned().await {
                        Ok(_permit) => match tokio::task::spawn_blocking(job).await {
                            Ok(result) => result,
                            Err(e) => {
                                log::error!("Job panicked: {}", e);
                                JobResult::failed(format!("job panicked: {e}"))
                            }
                        },
                        Err(_) => JobResult::failed("worker pool closed"),
                    };
                    tracker.record(&result);
                    result
                })
            })
            .collect();

        BatchHandle { tracker, handles }
    }
}

/// Handle to a submitted batch.
#[derive(Debug)]
pub struct BatchHandle {
    tracker: Arc<Tracker>,
    handles: Vec<JoinHandle<JobResult>>,
}

impl BatchHandle {
    /// Non-blocking progress snapshot
    pub fn progress(&self) -> Progress {
        self.tracker.snapshot()
    }

    /// Whether every job has finished
    pub fn is_done(&self) -> bool {
        self.progress().done()
    }

    /// Poll every `period`, calling `on_tick` with each snapshot, until done.
    pub async fn poll_until_done<F>(&self, period: Duration, mut on_tick: F) -> Progress
    where
        F: FnMut(Progress),
    {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let progress = self.progress();
            on_tick(progress);
            if progress.done() {
                return progress;
            }
        }
    }

    /// Wait for every job; results are in submission order.
    pub async fn join(self) -> Vec<JobResult> {
        let mut results = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            results.push(
                handle
                    .await
                    .unwrap_or_else(|e| JobResult::failed(format!("job aborted: {e}"))),
            );
        }
        results
    }
}
