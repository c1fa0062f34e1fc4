//! # Basket Repository
//!
//! SQL for the `basket_lines` table, the persisted current sale.
//!
//! ```text
//! basket_lines.id        insertion order (kept across upserts)
//! basket_lines.product_id UNIQUE, one line per product
//!          │
//!          └──► products.id  (ON DELETE RESTRICT)
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{BasketLine, Money, ProductId};

#[derive(Debug, sqlx::FromRow)]
struct BasketLineRow {
    product_id: i64,
    product_name: String,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
    added_at: DateTime<Utc>,
}

impl From<BasketLineRow> for BasketLine {
    fn from(row: BasketLineRow) -> Self {
        BasketLine {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
            subtotal: Money::from_cents(row.subtotal_cents),
            added_at: row.added_at,
        }
    }
}

/// Repository for the current sale's lines.
#[derive(Debug)]
pub struct BasketRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> BasketRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        BasketRepository { conn }
    }

    /// All lines in insertion order, with the product name joined in.
    pub async fn lines(&mut self) -> DbResult<Vec<BasketLine>> {
        let rows = sqlx::query_as::<_, BasketLineRow>(
            r#"
            SELECT
                b.product_id,
                p.name AS product_name,
                b.quantity,
                b.unit_price_cents,
                b.subtotal_cents,
                b.added_at
            FROM basket_lines b
            JOIN products p ON p.id = b.product_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(BasketLine::from).collect())
    }

    /// Inserts a line, or overwrites the existing line for the same product.
    ///
    /// The row id survives the update, so the line keeps its position.
    pub async fn upsert(&mut self, line: &BasketLine) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO basket_lines
                (product_id, quantity, unit_price_cents, subtotal_cents, added_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(product_id) DO UPDATE SET
                quantity = excluded.quantity,
                unit_price_cents = excluded.unit_price_cents,
                subtotal_cents = excluded.subtotal_cents
            "#,
        )
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price.cents())
        .bind(line.subtotal.cents())
        .bind(line.added_at)
        .execute(&mut *self.conn)
        .await?;

        debug!(
            product_id = line.product_id,
            quantity = line.quantity,
            "Basket line saved"
        );
        Ok(())
    }

    /// Deletes the line for a product. Missing lines are ignored.
    pub async fn delete(&mut self, product_id: ProductId) -> DbResult<()> {
        sqlx::query("DELETE FROM basket_lines WHERE product_id = ?1")
            .bind(product_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM basket_lines")
            .execute(&mut *self.conn)
            .await?;

        debug!(removed = result.rows_affected(), "Basket cleared");
        Ok(result.rows_affected())
    }
}
