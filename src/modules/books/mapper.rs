//! Translation between wire DTOs and stored records.

use super::models::{AvailabilityStatus, Book, BookDto, InvalidStatus, NewBook};
use super::validator::ValidatedBook;

pub fn to_dto(book: &Book) -> BookDto {
    BookDto {
        book_id: book.book_id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        genre: book.genre.clone(),
        availability_status: book.availability_status.as_str().to_string(),
    }
}

/// A missing status means [`AvailabilityStatus::Available`].
pub fn to_new_book(book: ValidatedBook) -> Result<NewBook, InvalidStatus> {
    let availability_status = match book.availability_status.as_deref() {
        Some(text) => text.parse()?,
        None => AvailabilityStatus::default(),
    };

    Ok(NewBook {
        book_id: book.book_id,
        title: book.title,
        author: book.author,
        genre: book.genre,
        availability_status,
    })
}
