//! # Repository Module
//!
//! Database repository implementations for Libris.
//!
//! ## Decorator Over a Trait
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 BookRepository (trait)                          │
//! │                                                                 │
//! │   SaleService / callers                                         │
//! │        │                                                        │
//! │        ▼                                                        │
//! │   CachedBookRepository<R>   ← cache-first reads,                │
//! │        │                      write-through invalidation,       │
//! │        │                      per-id sell serialization         │
//! │        ▼                                                        │
//! │   SqliteBookRepository      ← the source of truth               │
//! │        │                                                        │
//! │        ▼                                                        │
//! │   SQLite (bound parameters only)                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decorator implements the same contract as the adapter it wraps, so
//! callers cannot tell whether they hold a cached stack or the raw store.
//!
//! ## Available Repositories
//!
//! - [`book::SqliteBookRepository`] - book CRUD and conditional sell
//! - [`cached::CachedBookRepository`] - the cache decorator
//! - [`order::OrderRepository`] - order inserts and report aggregation
//! - [`user::UserRepository`] - minimal employee records

use async_trait::async_trait;

use libris_core::{Book, BookId, NewBook};

use crate::error::DbResult;

pub mod book;
pub mod cached;
pub mod order;
pub mod user;

/// The shared contract of the persistent store adapter and its cache
/// decorator.
///
/// All operations return typed failures; connectivity loss surfaces as
/// `DbError::ConnectionFailed`/`PoolExhausted`, never as an empty or
/// default value masquerading as success.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Returns the full catalog.
    async fn find_all(&self) -> DbResult<Vec<Book>>;

    /// Looks up one book by id. `Ok(None)` means no such row.
    async fn find_by_id(&self, id: BookId) -> DbResult<Option<Book>>;

    /// Persists a new book and returns the stored row (with assigned id).
    async fn save(&self, book: &NewBook) -> DbResult<Book>;

    /// Deletes a book row.
    async fn delete(&self, id: BookId) -> DbResult<()>;

    /// Sets the absolute stock level (restocks and corrections).
    async fn update_stock(&self, id: BookId, new_stock: i64) -> DbResult<()>;

    /// Sells `quantity` copies: verifies availability, decrements stock,
    /// and returns the updated book.
    ///
    /// `quantity` must be positive; non-positive values fail with
    /// `CoreError::Validation` (a negative decrement would add stock).
    /// Fails with `CoreError::InsufficientStock` (wrapped in
    /// `DbError::Domain`) rather than committing a negative stock level.
    /// Not safely retryable: a retry after an ambiguous failure
    /// double-decrements.
    async fn sell(&self, id: BookId, quantity: i64) -> DbResult<Book>;

    /// Deletes every book row. Test fixtures only.
    async fn remove_all(&self) -> DbResult<()>;
}
