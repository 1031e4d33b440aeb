//! Result type aliases

use crate::error::AgError;

/// Standard Result type for Agroport operations
pub type AgResult<T> = Result<T, AgError>;
