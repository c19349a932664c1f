use serde_json::json;
use shelf_http::error::AppError;
use thiserror::Error;

use super::models::InvalidStatus;
use super::store::StoreError;

/// Failures of the book catalog operations.
#[derive(Debug, Error)]
pub enum BookError {
    /// A required field is missing or malformed
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// A search was issued without any criteria
    #[error("At least one parameter (bookId or title) must be provided")]
    MissingSearchCriteria,

    #[error("Book with ID {0} already exists")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("record store unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),
}

impl BookError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    pub fn book_not_found(book_id: &str) -> Self {
        Self::NotFound(format!("Book not found with Book ID: {}", book_id))
    }

    pub fn no_title_match(title: &str) -> Self {
        Self::NotFound(format!("No books found with title: {}", title))
    }

    /// Whether this is one of the caller-facing invalid-input kinds
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            BookError::InvalidField { .. } | BookError::MissingSearchCriteria
        )
    }
}

impl From<InvalidStatus> for BookError {
    fn from(err: InvalidStatus) -> Self {
        BookError::invalid_field("availabilityStatus", err.to_string())
    }
}

impl From<StoreError> for BookError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(book_id) => BookError::AlreadyExists(book_id),
            StoreError::Missing(book_id) => BookError::book_not_found(&book_id),
            other => BookError::StorageUnavailable(other),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        let message = err.to_string();
        if err.is_invalid_input() {
            tracing::debug!(error = %message, "book input rejected");
        }
        match err {
            BookError::InvalidField { field, .. } => {
                let error = if field == "availabilityStatus" {
                    "invalid"
                } else {
                    "required"
                };
                AppError::validation(vec![json!({ "field": field, "error": error })], message)
            }
            BookError::MissingSearchCriteria => AppError::bad_request(message),
            BookError::AlreadyExists(_) => AppError::conflict(
                vec![json!({ "field": "bookId", "error": "duplicate" })],
                message,
            ),
            BookError::NotFound(_) => AppError::not_found(message),
            BookError::StorageUnavailable(source) => {
                tracing::error!(error = %source, "record store failure");
                AppError::unavailable("The book catalog is temporarily unavailable")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn kinds_map_to_http_statuses() {
        let cases = [
            (
                BookError::invalid_field("title", "Title cannot be empty"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (BookError::MissingSearchCriteria, StatusCode::BAD_REQUEST),
            (
                BookError::AlreadyExists("001".to_string()),
                StatusCode::CONFLICT,
            ),
            (BookError::book_not_found("999"), StatusCode::NOT_FOUND),
            (
                BookError::StorageUnavailable(StoreError::Corrupt("bad row".to_string())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn store_conflicts_become_already_exists() {
        let err = BookError::from(StoreError::Duplicate("001".to_string()));
        assert!(matches!(err, BookError::AlreadyExists(ref id) if id == "001"));
        assert_eq!(err.to_string(), "Book with ID 001 already exists");
    }

    #[test]
    fn bad_status_is_invalid_input() {
        let err = BookError::from(InvalidStatus("SHELVED".to_string()));
        assert!(err.is_invalid_input());
        assert_eq!(err.to_string(), "invalid availability status 'SHELVED'");
    }
}
