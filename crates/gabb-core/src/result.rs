//! Convenience result type alias for Gabb.

use crate::error::AppError;

/// A specialized `Result` type for Gabb operations.
pub type AppResult<T> = Result<T, AppError>;
