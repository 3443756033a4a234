//! # Book Repository (store adapter)
//!
//! Durable CRUD and the conditional sell decrement against SQLite.
//!
//! Every query binds its parameters (`?1`-style placeholders); caller
//! values are never concatenated into SQL. This is a hard correctness
//! property (SQL-injection resistance), not a style preference.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::BookRepository;
use libris_core::{validate_new_book, validate_quantity, Book, BookId, CoreError, NewBook};

/// Columns of the `books` table, in struct order.
const BOOK_COLUMNS: &str =
    "id, title, author, price_cents, stock, publication_date, created_at, updated_at";

/// Repository for book database operations. The source of truth; the
/// cache decorator wraps this.
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// Creates a new SqliteBookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteBookRepository { pool }
    }

    /// Counts book rows (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_all(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY title, author"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Loaded catalog from store");
        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn save(&self, book: &NewBook) -> DbResult<Book> {
        debug!(title = %book.title, author = %book.author, "Inserting book");

        validate_new_book(book).map_err(CoreError::from)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO books (
                title, author, price_cents, stock,
                publication_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.price_cents)
        .bind(book.stock)
        .bind(book.publication_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", id))
    }

    async fn delete(&self, id: BookId) -> DbResult<()> {
        debug!(id, "Deleting book");

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        Ok(())
    }

    async fn update_stock(&self, id: BookId, new_stock: i64) -> DbResult<()> {
        debug!(id, new_stock, "Updating stock");

        let now = Utc::now();

        // Negative values are rejected by the CHECK (stock >= 0)
        // constraint and surface as IntegrityViolation.
        let result = sqlx::query(
            "UPDATE books SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(new_stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        Ok(())
    }

    async fn sell(&self, id: BookId, quantity: i64) -> DbResult<Book> {
        debug!(id, quantity, "Selling book");

        // A non-positive quantity would pass the stock guard below and
        // inflate inventory (stock - (-5) adds copies). Reject here so the
        // contract holds for callers that bypass the service layer.
        validate_quantity(quantity).map_err(CoreError::from)?;

        let now = Utc::now();

        // Conditional decrement: the WHERE clause makes the store itself
        // refuse an oversell, so this is correct even with writers in
        // other processes. rows_affected == 0 means the guard failed.
        let result = sqlx::query(
            r#"
            UPDATE books
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing row from an insufficient shelf.
            return match self.find_by_id(id).await? {
                Some(book) => Err(CoreError::InsufficientStock {
                    id,
                    available: book.stock,
                    requested: quantity,
                }
                .into()),
                None => Err(CoreError::BookNotFound(id).into()),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", id))
    }

    async fn remove_all(&self) -> DbResult<()> {
        debug!("Removing all books");

        sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
