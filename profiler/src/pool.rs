//! Fixed-width worker pool
//!
//! A set of long-lived tokio tasks draining one shared, unbounded job queue.
//! Submission never blocks; excess work waits in the queue until a worker is
//! free. There is no priority, cancellation or backpressure.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Job = BoxFuture<'static, ()>;

/// Errors returned by the worker pool
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Worker pool is closed")]
    Closed,
}

/// Pool of `width` workers sharing a single queue
pub struct WorkerPool {
    sender: mpsc::UnboundedSender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `width` workers on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or if called outside a tokio runtime.
    pub fn new(width: usize) -> Self {
        assert!(width > 0, "worker pool width must be at least 1");

        let (sender, receiver) = mpsc::unbounded_channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..width)
            .map(|worker_id| {
                let receiver = receiver.clone();
                tokio::spawn(worker_loop(worker_id, receiver))
            })
            .collect();

        debug!("Started worker pool with {} workers", width);

        Self { sender, workers }
    }

    /// Number of workers in the pool
    pub fn width(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job for execution. Returns immediately.
    pub fn submit<F>(&self, job: F) -> Result<(), PoolError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.sender
            .send(Box::pin(job))
            .map_err(|_| PoolError::Closed)
    }

    /// Close the queue and wait for the workers to drain it and exit
    pub async fn shutdown(self) {
        drop(self.sender);
        for handle in self.workers {
            if let Err(e) = handle.await {
                warn!("Worker task ended abnormally: {}", e);
            }
        }
    }
}

async fn worker_loop(worker_id: usize, receiver: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>) {
    loop {
        // The lock is only held while waiting for the next job, never while
        // running one.
        let job = { receiver.lock().await.recv().await };

        match job {
            Some(job) => job.await,
            None => break,
        }
    }
    debug!(worker_id, "Worker exiting");
}
