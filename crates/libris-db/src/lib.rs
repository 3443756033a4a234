//! # Libris Database Layer
//!
//! SQLite persistence for the Libris bookstore: connection pooling,
//! migrations, the repository stack, and the sale service.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        libris-db                                │
//! │                                                                 │
//! │   Bookstore ──── composition root                               │
//! │      │                                                          │
//! │      ├── SaleService ─── sell workflow + reports                │
//! │      │        │                                                 │
//! │      ├── CachedBookRepository ─── cache-first reads,            │
//! │      │        │                   write-through invalidation    │
//! │      │        ▼                                                 │
//! │      ├── SqliteBookRepository ─┐                                │
//! │      ├── OrderRepository ──────┼── bound-parameter SQL          │
//! │      └── UserRepository ───────┘                                │
//! │                │                                                │
//! │                ▼                                                │
//! │   Database (SqlitePool, WAL, migrations)                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain types and validation live in `libris-core`; this crate owns
//! everything that touches SQLite.

pub mod bookstore;
pub mod cache;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sales;

pub use bookstore::{Books, Bookstore};
pub use cache::Cache;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::book::SqliteBookRepository;
pub use repository::cached::CachedBookRepository;
pub use repository::order::OrderRepository;
pub use repository::user::UserRepository;
pub use repository::BookRepository;
pub use sales::SaleService;
