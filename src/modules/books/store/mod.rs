//! Record store seam for book persistence.

mod memory;
mod sqlite;

pub use memory::InMemoryBookStore;
pub use sqlite::SqliteBookStore;

use async_trait::async_trait;

use super::models::{Book, NewBook};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The unique constraint on `bookId` rejected a write
    #[error("book {0} already exists")]
    Duplicate(String),

    /// The record addressed by a write no longer exists
    #[error("book {0} not found")]
    Missing(String),

    /// A stored row could not be decoded into a [`Book`]
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Case-insensitive substring match used by every store's title search.
///
/// Folds case with Unicode rules, so `"ÉCOLE"` contains `"éc"`.
pub(crate) fn title_matches(title: &str, fragment: &str) -> bool {
    title.to_lowercase().contains(&fragment.to_lowercase())
}

/// Durable keyed storage for book records.
///
/// Implementations must enforce `bookId` uniqueness themselves and report a
/// violation as [`StoreError::Duplicate`].
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every record, in store-defined order
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    /// Insert a record, returning it with its assigned surrogate key
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    async fn exists_by_book_id(&self, book_id: &str) -> Result<bool, StoreError>;

    async fn find_by_book_id(&self, book_id: &str) -> Result<Option<Book>, StoreError>;

    /// Records whose title contains `fragment`, ignoring case
    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Book>, StoreError>;

    /// Overwrite the mutable fields of the record with `book.id`
    async fn update(&self, book: &Book) -> Result<Book, StoreError>;

    /// Remove the record with surrogate key `id`; returns whether it existed
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
