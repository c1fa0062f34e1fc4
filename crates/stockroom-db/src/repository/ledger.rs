//! # Ledger Repository
//!
//! The single `totals` row holding lifetime revenue and restock cost.

use sqlx::SqliteConnection;

use crate::error::{DbError, DbResult};
use stockroom_core::{Money, Totals};

#[derive(Debug, sqlx::FromRow)]
struct TotalsRow {
    revenue_cents: i64,
    cost_cents: i64,
}

#[derive(Debug)]
pub struct LedgerRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> LedgerRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        LedgerRepository { conn }
    }

    pub async fn totals(&mut self) -> DbResult<Totals> {
        let row = sqlx::query_as::<_, TotalsRow>(
            "SELECT revenue_cents, cost_cents FROM totals WHERE id = 1",
        )
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::InvalidData("totals row is missing".to_string()))?;

        Ok(Totals {
            revenue: Money::from_cents(row.revenue_cents),
            cost: Money::from_cents(row.cost_cents),
        })
    }

    /// Adds to lifetime revenue. Callers check the amount is not negative.
    pub async fn add_revenue(&mut self, amount: Money) -> DbResult<()> {
        sqlx::query("UPDATE totals SET revenue_cents = revenue_cents + ?1 WHERE id = 1")
            .bind(amount.cents())
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }

    /// Adds to lifetime cost. Callers check the amount is not negative.
    pub async fn add_cost(&mut self, amount: Money) -> DbResult<()> {
        sqlx::query("UPDATE totals SET cost_cents = cost_cents + ?1 WHERE id = 1")
            .bind(amount.cents())
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}
