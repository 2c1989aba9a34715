//! HTTP POST work unit

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::service::WorkUnit;
use super::types::{RequestError, RequestOutcome};
use crate::payload::Payload;

/// POSTs the shared payload to the target URL, once per `execute` call
///
/// No timeout and no retry are configured: a request that never completes
/// holds its worker forever.
pub struct HttpRequestExecutor {
    client: reqwest::Client,
    target_url: String,
    payload: Payload,
}

impl HttpRequestExecutor {
    pub fn new(target_url: impl Into<String>, payload: Payload) -> Result<Self, RequestError> {
        // No idle connections are kept, so every request opens its own
        // connection and closes it once the response is dropped. Proxy
        // environment variables are ignored: requests go to the target.
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .map_err(RequestError::Client)?;

        Ok(Self {
            client,
            target_url: target_url.into(),
            payload,
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    async fn post(&self) -> Result<RequestOutcome, RequestError> {
        let response = self
            .client
            .post(&self.target_url)
            .header(CONTENT_TYPE, "application/json")
            .body(self.payload.to_body())
            .send()
            .await
            .map_err(RequestError::Send)?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(RequestOutcome::Success);
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RequestError::ReadBody {
                status: status.as_u16(),
                source,
            })?;

        debug!(
            status = status.as_u16(),
            body_len = body.len(),
            "Unexpected response status"
        );

        Ok(RequestOutcome::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl WorkUnit for HttpRequestExecutor {
    async fn execute(&self) -> RequestOutcome {
        self.post().await.unwrap_or_else(RequestOutcome::Failed)
    }
}
