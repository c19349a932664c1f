use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{title_matches, BookStore, StoreError};
use crate::modules::books::models::{Book, NewBook};

#[derive(Default)]
struct Inner {
    next_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Volatile [`BookStore`] kept in process memory. Suitable for tests and
/// throwaway local runs; contents vanish with the process.
#[derive(Default)]
pub struct InMemoryBookStore {
    inner: Mutex<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave a half-written map
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.lock().books.values().cloned().collect())
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut inner = self.lock();
        if inner.books.values().any(|b| b.book_id == book.book_id) {
            return Err(StoreError::Duplicate(book.book_id));
        }

        inner.next_id += 1;
        let stored = Book {
            id: inner.next_id,
            book_id: book.book_id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            availability_status: book.availability_status,
        };
        inner.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn exists_by_book_id(&self, book_id: &str) -> Result<bool, StoreError> {
        Ok(self.lock().books.values().any(|b| b.book_id == book_id))
    }

    async fn find_by_book_id(&self, book_id: &str) -> Result<Option<Book>, StoreError> {
        Ok(self
            .lock()
            .books
            .values()
            .find(|b| b.book_id == book_id)
            .cloned())
    }

    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .lock()
            .books
            .values()
            .filter(|b| title_matches(&b.title, fragment))
            .cloned()
            .collect())
    }

    async fn update(&self, book: &Book) -> Result<Book, StoreError> {
        let mut inner = self.lock();
        match inner.books.get_mut(&book.id) {
            Some(stored) => {
                stored.title = book.title.clone();
                stored.author = book.author.clone();
                stored.genre = book.genre.clone();
                stored.availability_status = book.availability_status;
                Ok(stored.clone())
            }
            None => Err(StoreError::Missing(book.book_id.clone())),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock().books.remove(&id).is_some())
    }
}
