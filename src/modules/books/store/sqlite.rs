use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use super::{title_matches, BookStore, StoreError};
use crate::modules::books::models::{AvailabilityStatus, Book, NewBook};

const COLUMNS: &str = "id, book_id, title, author, genre, availability_status";

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    book_id: String,
    title: String,
    author: String,
    genre: Option<String>,
    availability_status: String,
}

impl TryFrom<BookRow> for Book {
    type Error = StoreError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let availability_status: AvailabilityStatus = row
            .availability_status
            .parse()
            .map_err(|err| StoreError::Corrupt(format!("book {}: {}", row.book_id, err)))?;

        Ok(Book {
            id: row.id,
            book_id: row.book_id,
            title: row.title,
            author: row.author,
            genre: row.genre,
            availability_status,
        })
    }
}

/// [`BookStore`] over the `books` table created by the module migration.
#[derive(Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows: Vec<BookRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM books ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let result = sqlx::query_as::<_, BookRow>(&format!(
            "INSERT INTO books (book_id, title, author, genre, availability_status) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.availability_status.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => row.try_into(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(book.book_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn exists_by_book_id(&self, book_id: &str) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_book_id(&self, book_id: &str) -> Result<Option<Book>, StoreError> {
        let row: Option<BookRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM books WHERE book_id = ?"))
                .bind(book_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Book::try_from).transpose()
    }

    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Book>, StoreError> {
        // SQLite's lower() only folds ASCII, so matching happens here
        let rows: Vec<BookRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM books ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter()
            .filter(|row| title_matches(&row.title, fragment))
            .map(Book::try_from)
            .collect()
    }

    async fn update(&self, book: &Book) -> Result<Book, StoreError> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "UPDATE books SET title = ?, author = ?, genre = ?, availability_status = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.availability_status.as_str())
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(StoreError::Missing(book.book_id.clone())),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
