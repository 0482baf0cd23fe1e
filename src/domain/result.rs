//! Result type alias for Refiner
//!
//! This module provides a convenient Result type alias that uses RefinerError
//! as the error type.

use super::errors::RefinerError;

/// Result type alias for Refiner operations
///
/// # Examples
///
/// ```
/// use refiner::domain::result::Result;
/// use refiner::domain::errors::RefinerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(RefinerError::Other("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RefinerError>;
