//! # libris-core: Pure Business Logic for Libris
//!
//! This crate is the heart of the Libris bookstore core. It contains all
//! business logic as pure functions and value types with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Libris Architecture                        │
//! │                                                                 │
//! │  Presentation layer (external collaborator)                     │
//! │       │ book ids, sale quantities in; view models out           │
//! │       ▼                                                         │
//! │  libris-db                                                      │
//! │    Bookstore ─► SaleService ─► CachedBookRepository ─► SQLite   │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ★ libris-core (THIS CRATE) ★                                   │
//! │    types • money • notification • validation • error            │
//! │                                                                 │
//! │    NO I/O • NO DATABASE • PURE FUNCTIONS                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Order, Report, User)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`notification`] - Result wrapper carrying human-readable messages
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic - same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod notification;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use notification::{Notification, SaleNotification};
pub use types::*;
pub use validation::{
    validate_author, validate_new_book, validate_price_cents, validate_quantity, validate_stock,
    validate_title, ValidationResult,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single book in one sale.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_SALE_QUANTITY: i64 = 999;

/// Maximum length for book titles and author names.
pub const MAX_TEXT_LENGTH: usize = 200;
