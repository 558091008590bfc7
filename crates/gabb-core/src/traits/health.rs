//! Readiness checks for infrastructure the server depends on.

use async_trait::async_trait;

use crate::result::AppResult;

/// One dependency reported by the detailed health endpoint.
#[async_trait]
pub trait HealthCheck: Send + Sync + std::fmt::Debug + 'static {
    /// Component name shown in the report (e.g., "database").
    fn component(&self) -> &str;

    /// `Ok(true)` when the dependency answers. Errors count as down.
    async fn check(&self) -> AppResult<bool>;
}
