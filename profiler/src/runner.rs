//! Run orchestration
//!
//! Submits one work unit per request to a fixed-width pool, waits on the
//! completion barrier and reports the elapsed wall-clock time.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::barrier::CompletionBarrier;
use crate::diagnostics::Diagnostics;
use crate::executor::{RequestError, RequestOutcome, WorkUnit};
use crate::pool::{PoolError, WorkerPool};

/// Number of requests allowed to run concurrently
pub const WORKER_COUNT: usize = 8;

/// Errors that abort a run before it completes
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to submit work unit: {0}")]
    Submit(#[from] PoolError),
}

/// Result of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Number of work units executed
    pub requests: u64,
    /// Wall-clock time from first submission to last completion
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn new(requests: u64, elapsed: Duration) -> Self {
        Self {
            requests,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Elapsed time in seconds, millisecond precision
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for RunReport {
    /// Seconds as a bare number: `0.123`, `1.0`, `12.5`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.elapsed_seconds())
    }
}

/// Fires a fixed number of work units through a bounded pool
pub struct LoadRunner {
    unit: Arc<dyn WorkUnit>,
    diagnostics: Diagnostics,
}

impl LoadRunner {
    pub fn new(unit: Arc<dyn WorkUnit>, diagnostics: Diagnostics) -> Self {
        Self { unit, diagnostics }
    }

    /// Execute `request_count` work units and wait for all of them.
    ///
    /// Individual request failures never abort the run; they are only
    /// reported to diagnostics.
    pub async fn run(&self, request_count: u64) -> Result<RunReport, RunError> {
        let pool = WorkerPool::new(WORKER_COUNT);
        let barrier = Arc::new(CompletionBarrier::new(request_count));

        info!(
            "Submitting {} requests to {} workers",
            request_count, WORKER_COUNT
        );

        let start = Instant::now();

        for _ in 0..request_count {
            let unit = self.unit.clone();
            let diagnostics = self.diagnostics.clone();
            let barrier = barrier.clone();

            pool.submit(async move {
                let outcome = execute_guarded(unit.as_ref()).await;
                diagnostics.report(&outcome);
                barrier.count_down();
            })?;
        }

        barrier.wait().await;
        let report = RunReport::new(request_count, start.elapsed());

        pool.shutdown().await;

        debug!(report = %report.to_json(), "Run finished");
        Ok(report)
    }
}

/// Run a unit, turning a panic into a failed outcome so the barrier is still
/// decremented.
async fn execute_guarded(unit: &dyn WorkUnit) -> RequestOutcome {
    match AssertUnwindSafe(unit.execute()).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            RequestOutcome::Failed(RequestError::Panicked(message))
        }
    }
}
