//! Diagnostic channel for per-request outcomes
//!
//! Successful requests are silent. Non-200 responses have their raw body
//! written to the sink; failed requests are logged at `error` level. Nothing
//! here feeds back into the run.

use std::io::Write;
#[cfg(any(test, feature = "test-utils"))]
use std::sync::{Arc, Mutex};

use tracing::error;

use crate::executor::RequestOutcome;

#[derive(Debug, Clone)]
enum Sink {
    Stderr,
    #[cfg(any(test, feature = "test-utils"))]
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Where response bodies of unexpected statuses end up
#[derive(Debug, Clone)]
pub struct Diagnostics {
    sink: Sink,
}

impl Diagnostics {
    /// Write raw response bodies to the process's stderr
    pub fn stderr() -> Self {
        Self { sink: Sink::Stderr }
    }

    /// Keep raw response bodies in memory, see [`captured`](Self::captured)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Bytes written so far by a buffered sink (empty for stderr)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn captured(&self) -> Vec<u8> {
        match &self.sink {
            Sink::Stderr => Vec::new(),
            Sink::Buffer(buffer) => buffer.lock().map(|b| b.clone()).unwrap_or_default(),
        }
    }

    /// Report the outcome of one request. Best effort: write failures are
    /// ignored.
    pub fn report(&self, outcome: &RequestOutcome) {
        match outcome {
            RequestOutcome::Success => {}
            RequestOutcome::UnexpectedStatus { body, .. } => self.write_raw(body),
            RequestOutcome::Failed(e) => error!("Request failed: {:?}", e),
        }
    }

    fn write_raw(&self, bytes: &[u8]) {
        // One write per body so concurrent reports never interleave.
        match &self.sink {
            Sink::Stderr => {
                let mut stderr = std::io::stderr().lock();
                let _ = stderr.write_all(bytes);
                let _ = stderr.flush();
            }
            #[cfg(any(test, feature = "test-utils"))]
            Sink::Buffer(buffer) => {
                if let Ok(mut buffer) = buffer.lock() {
                    buffer.extend_from_slice(bytes);
                }
            }
        }
    }
}
