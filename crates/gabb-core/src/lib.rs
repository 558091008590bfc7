//! # gabb-core
//!
//! Core crate for the Gabb backend. Contains the traits implemented by the
//! infrastructure crates, configuration schemas, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Gabb crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
