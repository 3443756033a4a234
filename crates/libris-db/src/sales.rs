//! # Sale Service
//!
//! The sell workflow and sales reporting, expressed over the
//! [`BookRepository`] contract rather than a concrete store.
//!
//! ## Sell Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  validate quantity                                              │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  books.sell(id, qty)    ← availability check + decrement        │
//! │       │                   (atomic at the store)                 │
//! │       ▼                                                         │
//! │  orders.insert(...)     ← price snapshot at sale time           │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  Notification<Book>     ← operator-facing outcome               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures come back as a [`SaleNotification`] carrying operator-facing
//! messages; the typed errors stay inside this module.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::DbError;
use crate::repository::order::OrderRepository;
use crate::repository::BookRepository;
use libris_core::{
    validate_quantity, BookId, CoreError, NewOrder, Notification, Report, ReportPeriod,
    SaleNotification, UserId,
};

/// Operator-facing failure messages.
///
/// Deliberately free of ids and internals; the structured detail goes to
/// the log, not the counter display.
mod msg {
    pub const BOOK_NOT_FOUND: &str = "Book not found!";
    pub const STORE_UNAVAILABLE: &str =
        "Something is wrong with the database! Please try again.";
    pub const NO_ORDERS: &str = "The employee does not have any orders in this period";
}

/// Coordinates sells and reports over a book repository and the order log.
pub struct SaleService<R> {
    books: Arc<R>,
    orders: OrderRepository,
}

impl<R: BookRepository> SaleService<R> {
    /// Creates a new SaleService.
    pub fn new(books: Arc<R>, orders: OrderRepository) -> Self {
        SaleService { books, orders }
    }

    /// Sells `quantity` copies of a book on behalf of an employee.
    ///
    /// On success the notification carries the post-sale book. On failure
    /// it carries messages an operator can act on; stock is untouched.
    pub async fn sell(&self, book_id: BookId, user_id: UserId, quantity: i64) -> SaleNotification {
        if let Err(e) = validate_quantity(quantity) {
            return Notification::failure(e.to_string());
        }

        let book = match self.books.sell(book_id, quantity).await {
            Ok(book) => book,
            Err(e) => return Notification::failure(sell_message(&e)),
        };

        info!(
            book_id,
            user_id,
            quantity,
            remaining = book.stock,
            "Sale completed"
        );

        let mut notification = Notification::success(book.clone());

        // quantity <= MAX_SALE_QUANTITY and price fits in i64 cents, so the
        // multiplication cannot overflow in practice; guard anyway.
        let total = match book.price().line_total(quantity) {
            Some(total) => total,
            None => {
                warn!(book_id, quantity, "Order total overflowed; order not recorded");
                notification.add_error("Sale completed but the order could not be recorded");
                return notification;
            }
        };

        let order = NewOrder {
            book_id,
            user_id,
            quantity,
            unit_price_cents: book.price_cents,
            total_cents: total.cents(),
            order_date: Utc::now(),
        };

        // The decrement already committed; a failed order insert is a
        // bookkeeping gap, not a reason to claim the sale failed.
        if let Err(e) = self.orders.insert(&order).await {
            warn!(book_id, user_id, error = %e, "Order insert failed after stock decrement");
            notification.add_error("Sale completed but the order could not be recorded");
        }

        notification
    }

    /// Aggregated sales for one employee inside `period`.
    pub async fn sales_report(
        &self,
        user_id: UserId,
        period: &ReportPeriod,
    ) -> Notification<Report> {
        match self.orders.sales_report(user_id, period).await {
            Ok(Some(report)) => Notification::success(report),
            Ok(None) => Notification::failure(msg::NO_ORDERS),
            Err(e) => {
                warn!(user_id, error = %e, "Sales report query failed");
                Notification::failure(report_message(&e))
            }
        }
    }

    /// Current-calendar-month report, the common case at the counter.
    pub async fn monthly_report(&self, user_id: UserId) -> Notification<Report> {
        self.sales_report(user_id, &ReportPeriod::month_of(Utc::now()))
            .await
    }

    /// The book repository this service sells through.
    pub fn books(&self) -> &R {
        &self.books
    }
}

fn sell_message(error: &DbError) -> String {
    match error {
        DbError::Domain(CoreError::InsufficientStock { available, .. }) => {
            format!("Insufficient stock: only {available} left")
        }
        DbError::Domain(CoreError::BookNotFound(_)) | DbError::NotFound { .. } => {
            msg::BOOK_NOT_FOUND.to_string()
        }
        e if e.is_unavailable() => msg::STORE_UNAVAILABLE.to_string(),
        e => e.to_string(),
    }
}

fn report_message(error: &DbError) -> String {
    if error.is_unavailable() {
        msg::STORE_UNAVAILABLE.to_string()
    } else {
        error.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
