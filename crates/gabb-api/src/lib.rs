//! # gabb-api
//!
//! HTTP API layer for Gabb built on Axum.
//!
//! Hosts the web flows that consume single-use tokens (email validation
//! and password reset), health endpoints, the bearer-token extractor, CORS
//! and request logging middleware, and error-to-response mapping.

pub mod app;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
