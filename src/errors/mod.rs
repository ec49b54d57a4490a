pub mod person;

pub use person::{PersonError, PersonResult};

/// Broad classes of failure an operation can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The server could not be reached or refused the session
    Connection,
    /// The write was rejected before or by the server
    Validation,
    /// A query or command failed in transit or on the server
    Query,
    /// The target document does not exist
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Expected,
    Minor,
    Important,
    Critical,
}

/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Stable code used in log lines
    fn error_code(&self) -> &'static str;

    fn error_category(&self) -> ErrorCategory;

    fn error_severity(&self) -> ErrorSeverity;

    /// Get optional suggested action for the user
    fn suggested_action(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn require_name(name: &str) -> PersonResult<&str> {
        if name.is_empty() {
            return Err(PersonError::MissingName);
        }
        Ok(name)
    }

    #[test]
    fn test_person_result_is_reexported() {
        assert_eq!(require_name("John").unwrap(), "John");
        let err = require_name("").unwrap_err();
        assert_eq!(err.error_category(), ErrorCategory::Validation);
        assert_eq!(err.error_code(), "PERSON_MISSING_NAME");
    }
}
