//! Result type alias for Faceless
//!
//! This module provides a convenient Result type alias that uses [`FacelessError`]
//! as the error type.

use super::errors::FacelessError;

/// Result type alias for Faceless operations
///
/// # Examples
///
/// ```
/// use faceless::domain::result::Result;
/// use faceless::domain::errors::FacelessError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FacelessError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FacelessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(FacelessError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
