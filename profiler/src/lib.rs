//! Profile load generator library
//!
//! This module exports the load generator components for use by the
//! `profile` binary and integration tests.

pub mod barrier;
pub mod config;
pub mod diagnostics;
pub mod executor;
pub mod payload;
pub mod pool;
pub mod runner;

// Re-export commonly used types
pub use diagnostics::Diagnostics;
pub use executor::{HttpRequestExecutor, RequestOutcome, WorkUnit};
pub use payload::Payload;
pub use runner::{LoadRunner, RunReport, WORKER_COUNT};
