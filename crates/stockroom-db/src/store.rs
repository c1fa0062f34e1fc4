//! # SQLite Unit of Work
//!
//! Plugs [`Database`] into the core's store ports.
//!
//! ```text
//! PointOfSale::commit()
//!      │
//!      ▼
//! Database::begin() ──► BEGIN
//!      │
//!      ├── BasketRepository::lines        SELECT ... JOIN products
//!      ├── ProductRepository::update      UPDATE products (per line)
//!      ├── LedgerRepository::add_revenue  UPDATE totals
//!      ├── BasketRepository::clear        DELETE FROM basket_lines
//!      │
//!      ▼
//! SqliteWork::commit() ──► COMMIT     (dropped early ──► ROLLBACK)
//! ```

use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::{BasketRepository, LedgerRepository, ProductRepository, SettingsRepository};
use stockroom_core::store::{
    accumulate, BasketStore, LedgerStore, ProductStore, SettingsStore, Store, UnitOfWork,
};
use stockroom_core::{
    BasketLine, CoreError, CoreResult, Money, NewProduct, Product, ProductId, TaxRate, Totals,
};

/// One SQLite transaction seen through the store ports.
#[derive(Debug)]
pub struct SqliteWork {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteWork {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        SqliteWork { tx }
    }

    fn products(&mut self) -> ProductRepository<'_> {
        ProductRepository::new(&mut self.tx)
    }

    fn basket(&mut self) -> BasketRepository<'_> {
        BasketRepository::new(&mut self.tx)
    }

    fn ledger(&mut self) -> LedgerRepository<'_> {
        LedgerRepository::new(&mut self.tx)
    }

    fn settings(&mut self) -> SettingsRepository<'_> {
        SettingsRepository::new(&mut self.tx)
    }
}

#[async_trait]
impl ProductStore for SqliteWork {
    async fn product_by_id(&mut self, id: ProductId) -> CoreResult<Option<Product>> {
        Ok(self.products().get_by_id(id).await?)
    }

    async fn product_by_name(&mut self, name: &str) -> CoreResult<Option<Product>> {
        Ok(self.products().get_by_name(name).await?)
    }

    async fn list_products(&mut self) -> CoreResult<Vec<Product>> {
        Ok(self.products().list().await?)
    }

    async fn insert_product(&mut self, product: &NewProduct) -> CoreResult<Product> {
        Ok(self.products().insert(product).await?)
    }

    async fn update_product(&mut self, product: &Product) -> CoreResult<()> {
        Ok(self.products().update(product).await?)
    }

    async fn delete_product(&mut self, id: ProductId) -> CoreResult<()> {
        self.products().delete(id).await.map_err(|e| match e {
            DbError::ForeignKeyViolation { .. } => {
                CoreError::Conflict(format!("product #{} is referenced by the basket", id))
            }
            other => other.into(),
        })
    }
}

#[async_trait]
impl BasketStore for SqliteWork {
    async fn basket_lines(&mut self) -> CoreResult<Vec<BasketLine>> {
        Ok(self.basket().lines().await?)
    }

    async fn save_basket_line(&mut self, line: &BasketLine) -> CoreResult<()> {
        self.basket().upsert(line).await.map_err(|e| match e {
            DbError::ForeignKeyViolation { .. } => {
                DbError::not_found("Product", line.product_name.clone()).into()
            }
            other => other.into(),
        })
    }

    async fn delete_basket_line(&mut self, product_id: ProductId) -> CoreResult<()> {
        Ok(self.basket().delete(product_id).await?)
    }

    async fn clear_basket(&mut self) -> CoreResult<()> {
        self.basket().clear().await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteWork {
    async fn totals(&mut self) -> CoreResult<Totals> {
        Ok(self.ledger().totals().await?)
    }

    async fn add_revenue(&mut self, amount: Money) -> CoreResult<()> {
        let current = self.ledger().totals().await?.revenue;
        accumulate("revenue", current, amount)?;
        Ok(self.ledger().add_revenue(amount).await?)
    }

    async fn add_cost(&mut self, amount: Money) -> CoreResult<()> {
        let current = self.ledger().totals().await?.cost;
        accumulate("cost", current, amount)?;
        Ok(self.ledger().add_cost(amount).await?)
    }
}

#[async_trait]
impl SettingsStore for SqliteWork {
    async fn tax_rate(&mut self) -> CoreResult<TaxRate> {
        Ok(self.settings().tax_rate().await?)
    }

    async fn set_tax_rate(&mut self, rate: TaxRate) -> CoreResult<()> {
        Ok(self.settings().set_tax_rate(rate).await?)
    }
}

#[async_trait]
impl UnitOfWork for SqliteWork {
    async fn commit(self) -> CoreResult<()> {
        self.tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }
}

#[async_trait]
impl Store for Database {
    type Work = SqliteWork;

    async fn begin(&self) -> CoreResult<SqliteWork> {
        Ok(Database::begin(self).await?)
    }
}

// =============================================================================
// Tests
// =============================================================================
//
// The service scenarios from stockroom-core, run against SQLite.
