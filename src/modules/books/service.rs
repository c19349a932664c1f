use std::sync::Arc;

use super::error::BookError;
use super::mapper;
use super::models::{Book, BookDto, BookPayload};
use super::store::BookStore;
use super::validator;

/// Catalog operations over an injected [`BookStore`].
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_books(&self) -> Result<Vec<BookDto>, BookError> {
        let books = self.store.list().await?;
        tracing::debug!(count = books.len(), "listed books");
        Ok(books.iter().map(mapper::to_dto).collect())
    }

    /// Validate, reject duplicates, apply the default status and insert.
    ///
    /// A concurrent insert of the same `bookId` that slips past the
    /// existence check is still rejected by the store as `AlreadyExists`.
    pub async fn add_book(&self, payload: BookPayload) -> Result<BookDto, BookError> {
        let validated = validator::validate_new_book(payload)?;

        if self.store.exists_by_book_id(&validated.book_id).await? {
            return Err(BookError::AlreadyExists(validated.book_id));
        }

        let new_book = mapper::to_new_book(validated)?;
        let stored = self.store.insert(new_book).await?;

        tracing::info!(
            book_id = %stored.book_id,
            status = %stored.availability_status,
            "book added"
        );
        Ok(mapper::to_dto(&stored))
    }

    /// Look books up by exact `book_id`, or else by title fragment.
    ///
    /// `book_id` wins when both are given. An empty string still counts as
    /// given.
    pub async fn search_books(
        &self,
        book_id: Option<&str>,
        title: Option<&str>,
    ) -> Result<Vec<BookDto>, BookError> {
        if let Some(book_id) = book_id {
            let book = self.find(book_id).await?;
            return Ok(vec![mapper::to_dto(&book)]);
        }

        let Some(title) = title else {
            return Err(BookError::MissingSearchCriteria);
        };

        let books = self.store.search_by_title(title).await?;
        if books.is_empty() {
            return Err(BookError::no_title_match(title));
        }

        tracing::debug!(%title, count = books.len(), "title search matched");
        Ok(books.iter().map(mapper::to_dto).collect())
    }

    /// Merge the supplied fields into the stored record.
    ///
    /// Blank `title`/`author` values are ignored; a supplied status always
    /// replaces the stored one. `bookId` and `genre` are never changed here.
    pub async fn update_book(
        &self,
        book_id: &str,
        changes: BookPayload,
    ) -> Result<BookDto, BookError> {
        let mut book = self.find(book_id).await?;

        if let Some(title) = non_blank(changes.title) {
            book.title = title;
        }
        if let Some(author) = non_blank(changes.author) {
            book.author = author;
        }
        if let Some(status) = changes.availability_status {
            book.availability_status = status.parse()?;
        }

        let updated = self.store.update(&book).await?;

        tracing::info!(book_id = %updated.book_id, "book updated");
        Ok(mapper::to_dto(&updated))
    }

    pub async fn delete_book(&self, book_id: &str) -> Result<(), BookError> {
        let book = self.find(book_id).await?;

        if !self.store.delete(book.id).await? {
            return Err(BookError::book_not_found(book_id));
        }

        tracing::info!(%book_id, "book deleted");
        Ok(())
    }

    async fn find(&self, book_id: &str) -> Result<Book, BookError> {
        self.store
            .find_by_book_id(book_id)
            .await?
            .ok_or_else(|| BookError::book_not_found(book_id))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
