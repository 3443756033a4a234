//! # Domain Types
//!
//! Core domain types used throughout Libris.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐      │
//! │  │     Book      │   │     Order     │   │    Report     │      │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │      │
//! │  │ id (i64)      │   │ id (i64)      │   │ user_id       │      │
//! │  │ title, author │   │ book_id (FK)  │   │ username      │      │
//! │  │ price_cents   │   │ quantity      │   │ units_sold    │      │
//! │  │ stock         │   │ price snapshot│   │ revenue_cents │      │
//! │  └───────────────┘   └───────────────┘   └───────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Books are mutated in place (stock decrements, restocks); orders are
//! immutable once persisted; reports are derived aggregates and never
//! stored or cached.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Database identity of a book row.
pub type BookId = i64;

/// Database identity of a user row.
pub type UserId = i64;

// =============================================================================
// Book
// =============================================================================

/// A book in the store catalog.
///
/// Invariant: `stock >= 0` at all times. A sale that would make stock
/// negative must fail instead of committing (enforced by the repository's
/// conditional decrement and by a CHECK constraint in the schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Unique identifier (autoincrement).
    pub id: BookId,

    /// Book title.
    pub title: String,

    /// Author display name.
    pub author: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Copies currently on the shelf. Never negative.
    pub stock: i64,

    /// Publication date, used to derive the book's age.
    pub publication_date: NaiveDate,

    /// When the row was created.
    pub created_at: DateTime<Utc>,

    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether `quantity` copies can currently be sold.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }

    /// Age of the book in whole years as of `on`.
    ///
    /// Books published later than `on` report age 0.
    pub fn age_in_years(&self, on: NaiveDate) -> i64 {
        let mut years = i64::from(on.year()) - i64::from(self.publication_date.year());
        if (on.month(), on.day()) < (self.publication_date.month(), self.publication_date.day()) {
            years -= 1;
        }
        years.max(0)
    }
}

/// Fields for inserting a new book; the store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    pub stock: i64,
    pub publication_date: NaiveDate,
}

// =============================================================================
// Order
// =============================================================================

/// A recorded sale of one book to one employee's customer.
///
/// Immutable once persisted. Unit price and line total are snapshots taken
/// at sale time so reports survive later price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub book_id: BookId,
    pub user_id: UserId,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total in cents at time of sale (frozen).
    pub total_cents: i64,
    pub order_date: DateTime<Utc>,
}

impl Order {
    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Fields for recording a new order; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub book_id: BookId,
    pub user_id: UserId,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub order_date: DateTime<Utc>,
}

// =============================================================================
// Report
// =============================================================================

/// Per-user sales summary over a time window.
///
/// Derived from committed order rows, read directly from the store and
/// never cached: financial reports must reflect the latest committed
/// state including sales from other concurrent sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Report {
    pub user_id: UserId,
    pub username: String,
    /// Total units sold in the period.
    pub units_sold: i64,
    /// Total revenue in cents for the period.
    pub revenue_cents: i64,
}

impl Report {
    /// Returns the revenue as Money.
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

/// Half-open time window for report aggregation: `[from, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl ReportPeriod {
    /// Creates a period from explicit bounds.
    pub fn new(from: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        ReportPeriod { from, until }
    }

    /// The calendar month containing `at` (the default reporting window).
    pub fn month_of(at: DateTime<Utc>) -> Self {
        let date = at.date_naive();
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("first of month is a valid date");
        let next = if date.month() == 12 {
            NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
        }
        .expect("first of month is a valid date");

        ReportPeriod {
            from: start.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
            until: next.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
        }
    }

    /// Whether `at` falls inside the window.
    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at < self.until
    }
}

// =============================================================================
// User
// =============================================================================

/// An employee account.
///
/// Carried only because orders reference users and reports join usernames.
/// Authentication and rights modeling are out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
}

/// Fields for inserting a new user; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
