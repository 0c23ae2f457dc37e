//! Result type alias for labload

use super::errors::LoaderError;

/// Result type alias for labload operations
///
/// # Examples
///
/// ```
/// use labload::domain::result::Result;
/// use labload::domain::errors::LoaderError;
///
/// fn failing_function() -> Result<()> {
///     Err(LoaderError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LoaderError>;
