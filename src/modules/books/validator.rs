use super::error::BookError;
use super::models::BookPayload;

/// Creation payload whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub availability_status: Option<String>,
}

/// Check that `title`, `author` and `bookId` are present and non-blank, in
/// that order, failing on the first violation.
pub fn validate_new_book(payload: BookPayload) -> Result<ValidatedBook, BookError> {
    let title = require(payload.title, "title", "Title cannot be empty")?;
    let author = require(payload.author, "author", "Author cannot be empty")?;
    let book_id = require(payload.book_id, "bookId", "Book ID cannot be empty")?;

    Ok(ValidatedBook {
        book_id,
        title,
        author,
        genre: payload.genre,
        availability_status: payload.availability_status,
    })
}

fn require(
    value: Option<String>,
    field: &'static str,
    message: &str,
) -> Result<String, BookError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(BookError::invalid_field(field, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookPayload {
        BookPayload {
            book_id: Some("001".to_string()),
            title: Some("Hello".to_string()),
            author: Some("Rana Khunti".to_string()),
            genre: None,
            availability_status: None,
        }
    }

    fn failing_field(payload: BookPayload) -> &'static str {
        match validate_new_book(payload) {
            Err(BookError::InvalidField { field, .. }) => field,
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn complete_payload_passes() {
        let validated = validate_new_book(payload()).unwrap();
        assert_eq!(validated.book_id, "001");
        assert_eq!(validated.availability_status, None);
    }

    #[test]
    fn missing_and_blank_fields_are_reported() {
        assert_eq!(
            failing_field(BookPayload {
                title: None,
                ..payload()
            }),
            "title"
        );
        assert_eq!(
            failing_field(BookPayload {
                author: Some("   ".to_string()),
                ..payload()
            }),
            "author"
        );
        assert_eq!(
            failing_field(BookPayload {
                book_id: Some(String::new()),
                ..payload()
            }),
            "bookId"
        );
    }

    #[test]
    fn title_is_checked_before_book_id() {
        let empty = BookPayload::default();
        assert_eq!(failing_field(empty), "title");
    }
}
