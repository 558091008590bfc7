//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gabb_auth::{Authorizer, PasswordHasher};
use gabb_core::traits::{HealthCheck, PersonDirectory};

/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Bearer token verdicts and single-use token consumption.
    pub authorizer: Arc<Authorizer>,
    /// Account updates driven by single-use tokens.
    pub persons: Arc<dyn PersonDirectory>,
    /// Password hasher (Argon2).
    pub password_hasher: Arc<PasswordHasher>,
    /// Dependencies reported by `GET /health/detailed`.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Assemble state from its parts.
    pub fn new(authorizer: Authorizer, persons: Arc<dyn PersonDirectory>) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
            persons,
            password_hasher: Arc::new(PasswordHasher::new()),
            health_checks: Vec::new(),
        }
    }

    /// Register a dependency for the detailed health report.
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
