//! Request outcome and error definitions

use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while performing a single request
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request: {0}")]
    Send(#[source] reqwest::Error),

    #[error("Failed to read response body (status {status}): {source}")]
    ReadBody {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("Work unit panicked: {0}")]
    Panicked(String),
}

/// How a single request ended
///
/// Only consumed for diagnostics; the run never branches on it.
#[derive(Debug)]
pub enum RequestOutcome {
    /// The server answered 200
    Success,
    /// The server answered with any other status; `body` is the drained response
    UnexpectedStatus { status: u16, body: Bytes },
    /// The request never produced a status
    Failed(RequestError),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success)
    }
}
