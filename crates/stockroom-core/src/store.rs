//! # Store Ports
//!
//! Storage traits the services are written against.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Store::begin() ──► UnitOfWork                                          │
//! │                      ├── ProductStore   (catalog rows)                  │
//! │                      ├── BasketStore    (current sale lines)            │
//! │                      ├── LedgerStore    (revenue / cost totals)         │
//! │                      └── SettingsStore  (tax rate)                      │
//! │                                                                         │
//! │  work.commit()  ──► every change becomes visible at once               │
//! │  drop(work)     ──► every change is discarded                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backends: `stockroom_db::Database` (SQLite transaction) and
//! [`MemoryStore`](crate::memory::MemoryStore) (locked draft copy).

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BasketLine, NewProduct, Product, ProductId, TaxRate, Totals};

/// Catalog rows.
#[async_trait]
pub trait ProductStore: Send {
    async fn product_by_id(&mut self, id: ProductId) -> CoreResult<Option<Product>>;

    /// Exact, case-sensitive name match.
    async fn product_by_name(&mut self, name: &str) -> CoreResult<Option<Product>>;

    /// All products in id order.
    async fn list_products(&mut self) -> CoreResult<Vec<Product>>;

    /// Inserts a product; the store assigns id and timestamps.
    /// Fails with `Conflict` if the name is taken.
    async fn insert_product(&mut self, product: &NewProduct) -> CoreResult<Product>;

    /// Writes name, quantity, price and cost of an existing product and
    /// bumps `updated_at`. Fails with `Conflict` if another product holds
    /// the name.
    async fn update_product(&mut self, product: &Product) -> CoreResult<()>;

    /// Fails with `Conflict` while a basket line references the product.
    async fn delete_product(&mut self, id: ProductId) -> CoreResult<()>;
}

/// Lines of the single current sale.
#[async_trait]
pub trait BasketStore: Send {
    /// Lines in insertion order.
    async fn basket_lines(&mut self) -> CoreResult<Vec<BasketLine>>;

    /// Inserts the line, or replaces the line for the same product in place.
    async fn save_basket_line(&mut self, line: &BasketLine) -> CoreResult<()>;

    async fn delete_basket_line(&mut self, product_id: ProductId) -> CoreResult<()>;

    async fn clear_basket(&mut self) -> CoreResult<()>;
}

/// Lifetime revenue and cost accumulators.
///
/// Only restock and commit write here. Both amounts only grow.
#[async_trait]
pub trait LedgerStore: Send {
    async fn totals(&mut self) -> CoreResult<Totals>;

    /// Fails with `Validation` on a negative amount.
    async fn add_revenue(&mut self, amount: Money) -> CoreResult<()>;

    /// Fails with `Validation` on a negative amount.
    async fn add_cost(&mut self, amount: Money) -> CoreResult<()>;
}

#[async_trait]
pub trait SettingsStore: Send {
    async fn tax_rate(&mut self) -> CoreResult<TaxRate>;

    async fn set_tax_rate(&mut self, rate: TaxRate) -> CoreResult<()>;
}

/// One atomic batch of reads and writes across all four stores.
#[async_trait]
pub trait UnitOfWork: ProductStore + BasketStore + LedgerStore + SettingsStore + Sized {
    /// Makes every write visible. Dropping without commit rolls back.
    async fn commit(self) -> CoreResult<()>;
}

/// A storage backend that hands out units of work.
#[async_trait]
pub trait Store: Send + Sync {
    type Work: UnitOfWork;

    async fn begin(&self) -> CoreResult<Self::Work>;
}

fn ensure_ledger_amount(field: &str, amount: Money) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(crate::error::ValidationError::Negative {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Running total after adding `amount`, shared by the `add_revenue` and
/// `add_cost` implementations. Rejects negative amounts and totals past
/// the i64 range.
pub fn accumulate(field: &str, total: Money, amount: Money) -> CoreResult<Money> {
    ensure_ledger_amount(field, amount)?;
    total
        .checked_add(amount)
        .ok_or_else(|| CoreError::out_of_range(field, 0, i64::MAX))
}
