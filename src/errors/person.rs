use mongodb::error::ErrorKind;
use thiserror::Error;

use super::{AppError, ErrorCategory, ErrorSeverity};
use crate::models::PersonField;

/// Errors related to person document operations
#[derive(Error, Debug)]
pub enum PersonError {
    #[error("Failed to connect to MongoDB: {source}")]
    Connection { source: mongodb::error::Error },

    #[error("Person validation failed: name is required")]
    MissingName,

    #[error("'{id}' is not a valid document id")]
    InvalidId { id: String },

    #[error("Update must change at least one field")]
    EmptyUpdate,

    #[error("Field '{field}' cannot be excluded from query results")]
    InvalidProjection { field: PersonField },

    #[error("Query limit must be positive, got {limit}")]
    InvalidLimit { limit: i64 },

    #[error("Person with ID {id} not found")]
    NotFoundById { id: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: mongodb::error::Error,
    },
}

pub type PersonResult<T> = Result<T, PersonError>;

impl AppError for PersonError {
    fn user_message(&self) -> String {
        match self {
            PersonError::Connection { .. } => "Could not reach the database".to_string(),
            PersonError::MissingName => "Name is required".to_string(),
            PersonError::InvalidId { id } => format!("Invalid person id: {}", id),
            PersonError::EmptyUpdate => "Nothing to update".to_string(),
            PersonError::InvalidProjection { field } => format!("Cannot hide field {}", field),
            PersonError::InvalidLimit { limit } => format!("Invalid limit: {}", limit),
            PersonError::NotFoundById { .. } => "Person not found".to_string(),
            PersonError::Database { .. } => "A database error occurred".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PersonError::Connection { .. } => "PERSON_CONNECTION_FAILED",
            PersonError::MissingName => "PERSON_MISSING_NAME",
            PersonError::InvalidId { .. } => "PERSON_INVALID_ID",
            PersonError::EmptyUpdate => "PERSON_EMPTY_UPDATE",
            PersonError::InvalidProjection { .. } => "PERSON_INVALID_PROJECTION",
            PersonError::InvalidLimit { .. } => "PERSON_INVALID_LIMIT",
            PersonError::NotFoundById { .. } => "PERSON_NOT_FOUND_BY_ID",
            PersonError::Database { source } => match database_error_category(source) {
                ErrorCategory::Connection => "PERSON_DATABASE_UNREACHABLE",
                ErrorCategory::Validation => "PERSON_WRITE_REJECTED",
                _ => "PERSON_QUERY_FAILED",
            },
        }
    }

    fn error_category(&self) -> ErrorCategory {
        match self {
            PersonError::Connection { .. } => ErrorCategory::Connection,
            PersonError::MissingName
            | PersonError::InvalidId { .. }
            | PersonError::EmptyUpdate
            | PersonError::InvalidProjection { .. }
            | PersonError::InvalidLimit { .. } => ErrorCategory::Validation,
            PersonError::NotFoundById { .. } => ErrorCategory::NotFound,
            PersonError::Database { source } => database_error_category(source),
        }
    }

    fn error_severity(&self) -> ErrorSeverity {
        match self.error_category() {
            ErrorCategory::Connection => ErrorSeverity::Critical,
            ErrorCategory::Query => ErrorSeverity::Important,
            ErrorCategory::Validation => ErrorSeverity::Minor,
            ErrorCategory::NotFound => ErrorSeverity::Expected,
        }
    }

    fn suggested_action(&self) -> Option<String> {
        match self {
            PersonError::Connection { .. } => {
                Some("Check MONGO_URL and that the server is running".to_string())
            }
            PersonError::InvalidId { .. } => {
                Some("Ids are 24-character hexadecimal strings".to_string())
            }
            PersonError::MissingName => Some("Provide a non-empty name".to_string()),
            _ => None,
        }
    }
}

/// Convenience methods for creating common person errors
impl PersonError {
    pub fn invalid_id<S: Into<String>>(id: S) -> Self {
        Self::InvalidId { id: id.into() }
    }

    pub fn not_found_by_id<S: Into<String>>(id: S) -> Self {
        Self::NotFoundById { id: id.into() }
    }

    pub fn connection(source: mongodb::error::Error) -> Self {
        Self::Connection { source }
    }
}

fn database_error_category(error: &mongodb::error::Error) -> ErrorCategory {
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::Io(..) => ErrorCategory::Connection,
        ErrorKind::Write(..) | ErrorKind::InsertMany(..) => ErrorCategory::Validation,
        _ => ErrorCategory::Query,
    }
}
