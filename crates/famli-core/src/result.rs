//! Convenience result type alias for Famli.

use crate::error::AppError;

/// A specialized `Result` type for Famli operations.
pub type AppResult<T> = Result<T, AppError>;
