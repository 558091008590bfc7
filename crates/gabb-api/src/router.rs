//! Route definitions for the Gabb HTTP API.

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{get, post};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
        .merge(account_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Single-use token flows linked from emails.
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/validate_email", post(handlers::account::validate_email))
        .route("/reset_password", post(handlers::account::reset_password))
}
