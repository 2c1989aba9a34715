//! WorkUnit trait definition

use async_trait::async_trait;

use super::types::RequestOutcome;

/// One indivisible unit of load, run once per submitted request
///
/// Implementations never fail the caller: every error is folded into the
/// returned [`RequestOutcome`].
#[async_trait]
pub trait WorkUnit: Send + Sync {
    async fn execute(&self) -> RequestOutcome;
}
