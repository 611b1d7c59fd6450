//! Background worker pool for asynchronous commands.
//!
//! Jobs are passed over an unbounded channel to a dispatch loop running on
//! the tokio runtime, which hands each one to the blocking thread pool.
//! Submission never waits. There is no ordering guarantee between jobs and
//! no way to cancel a job once it has started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::WorkerConfig;
use crate::error::{CommandError, Result};

/// Unique identifier for a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

impl JobId {
    /// Generates a new unique job ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of background work.
pub struct Job {
    pub id: JobId,
    /// Command name, for logs.
    pub label: String,
    run: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    pub fn new(label: impl Into<String>, run: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id: JobId::new(),
            label: label.into(),
            run: Box::new(run),
        }
    }
}

/// Handle to the background worker pool.
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    cancel: CancellationToken,
    dispatch_loop: JoinHandle<()>,
}

impl WorkerPool {
    /// Spawns the dispatch loop on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(config: &WorkerConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let limit = match config.max_concurrent {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        let dispatch_loop = tokio::spawn(run_dispatch_loop(receiver, cancel.clone(), limit));

        Self {
            sender,
            cancel,
            dispatch_loop,
        }
    }

    /// Queues a job. Returns as soon as the job is queued.
    pub fn submit(&self, job: Job) -> Result<JobId> {
        if self.cancel.is_cancelled() {
            return Err(CommandError::worker("worker pool is closed"));
        }

        let id = job.id;
        self.sender
            .send(job)
            .map_err(|_| CommandError::worker("worker pool is closed"))?;
        Ok(id)
    }

    /// Stops accepting jobs and drops those still queued.
    ///
    /// Jobs already handed to a worker keep running to completion.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been requested.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops accepting jobs, lets the queued ones start and waits for the
    /// dispatch loop to exit.
    pub async fn close(self) -> Result<()> {
        drop(self.sender);
        self.dispatch_loop
            .await
            .map_err(|e| CommandError::internal(format!("worker dispatch loop failed: {e}")))
    }
}

async fn run_dispatch_loop(
    mut receiver: mpsc::UnboundedReceiver<Job>,
    cancel: CancellationToken,
    limit: Option<Arc<Semaphore>>,
) {
    loop {
        let job = tokio::select! {
            _ = cancel.cancelled() => break,
            job = receiver.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let permit = match &limit {
            Some(semaphore) => match Arc::clone(semaphore).acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => break,
            },
            None => None,
        };

        debug!(job = %job.id, command = %job.label, "Starting background job");
        tokio::spawn(async move {
            let Job { id, label, run } = job;
            let result = tokio::task::spawn_blocking(run).await;
            drop(permit);

            match result {
                Ok(()) => debug!(job = %id, command = %label, "Background job finished"),
                Err(e) if e.is_panic() => {
                    error!(job = %id, command = %label, "Background job panicked: {e}")
                }
                Err(e) => warn!(job = %id, command = %label, "Background job cancelled: {e}"),
            }
        });
    }

    debug!("Worker dispatch loop stopped");
}
