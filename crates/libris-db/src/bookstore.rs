//! # Bookstore
//!
//! Composition root: opens the database once and wires the repository
//! stack (store adapter → cache decorator → sale service) so the rest of
//! the application never assembles components by hand.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Bookstore::open(config)                                        │
//! │      │                                                          │
//! │      ├── Database (pool, migrations)                            │
//! │      ├── CachedBookRepository<SqliteBookRepository>  (shared)   │
//! │      └── SaleService over that same cached repository           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one cached repository exists per store; handing out a second
//! one would split the cache and break invalidation.

use std::sync::Arc;

use tracing::info;

use crate::error::DbResult;
use crate::pool::{Database, DbConfig};
use crate::repository::book::SqliteBookRepository;
use crate::repository::cached::CachedBookRepository;
use crate::repository::user::UserRepository;
use crate::sales::SaleService;

/// The cached repository type the bookstore wires up.
pub type Books = CachedBookRepository<SqliteBookRepository>;

/// One opened bookstore: database handle plus the wired service stack.
pub struct Bookstore {
    db: Database,
    books: Arc<Books>,
    sales: SaleService<Books>,
}

impl Bookstore {
    /// Opens the store and wires every component.
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        let db = Database::new(config).await?;

        let books = Arc::new(CachedBookRepository::new(db.books()));
        let sales = SaleService::new(Arc::clone(&books), db.orders());

        info!("Bookstore opened");

        Ok(Bookstore { db, books, sales })
    }

    /// The cache-decorated book repository (the one callers should use).
    pub fn books(&self) -> &Arc<Books> {
        &self.books
    }

    /// The sale service.
    pub fn sales(&self) -> &SaleService<Books> {
        &self.sales
    }

    /// The user repository.
    pub fn users(&self) -> UserRepository {
        self.db.users()
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
