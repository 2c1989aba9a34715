//! Request execution for a single work unit
//!
//! This module provides:
//! - `WorkUnit` trait for abstracting what one unit of load does
//! - `HttpRequestExecutor` which POSTs the payload to the target URL
//! - `RequestOutcome` describing how a single request ended

mod http;
mod service;
mod types;

pub use http::HttpRequestExecutor;
pub use service::WorkUnit;
pub use types::{RequestError, RequestOutcome};
