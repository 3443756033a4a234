//! # Order Repository
//!
//! Order inserts and per-employee sales aggregation.
//!
//! Each order row snapshots the unit price at sale time, so report revenue
//! is immune to later catalog price edits.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use libris_core::{NewOrder, Order, Report, ReportPeriod, UserId};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Records a completed sale.
    ///
    /// Called after the stock decrement committed; an order row never
    /// exists for a sale the store rejected.
    pub async fn insert(&self, order: &NewOrder) -> DbResult<Order> {
        debug!(
            book_id = order.book_id,
            user_id = order.user_id,
            quantity = order.quantity,
            "Recording order"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                book_id, user_id, quantity,
                unit_price_cents, total_cents, order_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(order.book_id)
        .bind(order.user_id)
        .bind(order.quantity)
        .bind(order.unit_price_cents)
        .bind(order.total_cents)
        .bind(order.order_date)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Looks up one order by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, book_id, user_id, quantity,
                   unit_price_cents, total_cents, order_date
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// All orders placed by one employee, newest first.
    pub async fn find_by_user(&self, user_id: UserId) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, book_id, user_id, quantity,
                   unit_price_cents, total_cents, order_date
            FROM orders
            WHERE user_id = ?1
            ORDER BY order_date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Aggregates one employee's sales inside a half-open time window
    /// (`from` inclusive, `until` exclusive).
    ///
    /// `Ok(None)` means the employee placed no orders in the window; that
    /// is a report outcome, not an error.
    pub async fn sales_report(
        &self,
        user_id: UserId,
        period: &ReportPeriod,
    ) -> DbResult<Option<Report>> {
        debug!(user_id, from = %period.from, until = %period.until, "Building sales report");

        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT o.user_id,
                   u.username,
                   CAST(SUM(o.quantity) AS INTEGER) AS units_sold,
                   CAST(SUM(o.total_cents) AS INTEGER) AS revenue_cents
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.user_id = ?1
              AND o.order_date >= ?2
              AND o.order_date < ?3
            GROUP BY o.user_id, u.username
            "#,
        )
        .bind(user_id)
        .bind(period.from)
        .bind(period.until)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Deletes every order row. Test fixtures only.
    pub async fn remove_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM orders").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
