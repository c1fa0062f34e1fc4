//! # In-Memory Store
//!
//! A [`Store`] that keeps everything in process. Nothing survives the
//! process; useful for tests and throwaway sessions.
//!
//! ## Transactions
//! ```text
//! begin()  ── lock state (owned guard) ── clone into draft
//!    │
//!    ├── reads/writes go to the draft
//!    │
//!    ├── commit() ── *guard = draft ── unlock
//!    └── drop     ── draft discarded ── unlock
//! ```
//!
//! Holding the lock for the life of the unit of work serializes units of
//! work the same way a single-connection SQLite pool does.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{
    accumulate, BasketStore, LedgerStore, ProductStore, SettingsStore, Store, UnitOfWork,
};
use crate::types::{BasketLine, NewProduct, Product, ProductId, TaxRate, Totals};

#[derive(Debug, Clone)]
struct MemoryState {
    products: BTreeMap<ProductId, Product>,
    next_id: ProductId,
    basket: Vec<BasketLine>,
    totals: Totals,
    tax_rate: TaxRate,
}

impl Default for MemoryState {
    fn default() -> Self {
        MemoryState {
            products: BTreeMap::new(),
            next_id: 1,
            basket: Vec::new(),
            totals: Totals::default(),
            tax_rate: TaxRate::default_tax(),
        }
    }
}

/// In-process storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Work = MemoryWork;

    async fn begin(&self) -> CoreResult<MemoryWork> {
        let guard = self.state.clone().lock_owned().await;
        let draft = guard.clone();
        Ok(MemoryWork { guard, draft })
    }
}

/// A unit of work over [`MemoryStore`].
pub struct MemoryWork {
    guard: OwnedMutexGuard<MemoryState>,
    draft: MemoryState,
}

#[async_trait]
impl ProductStore for MemoryWork {
    async fn product_by_id(&mut self, id: ProductId) -> CoreResult<Option<Product>> {
        Ok(self.draft.products.get(&id).cloned())
    }

    async fn product_by_name(&mut self, name: &str) -> CoreResult<Option<Product>> {
        Ok(self.draft.products.values().find(|p| p.name == name).cloned())
    }

    async fn list_products(&mut self) -> CoreResult<Vec<Product>> {
        Ok(self.draft.products.values().cloned().collect())
    }

    async fn insert_product(&mut self, product: &NewProduct) -> CoreResult<Product> {
        if self.draft.products.values().any(|p| p.name == product.name) {
            return Err(CoreError::Conflict(format!(
                "product '{}' already exists",
                product.name
            )));
        }

        let now = Utc::now();
        let id = self.draft.next_id;
        self.draft.next_id += 1;

        let created = Product {
            id,
            name: product.name.clone(),
            quantity: product.quantity,
            price: product.price,
            cost: product.cost,
            created_at: now,
            updated_at: now,
        };
        self.draft.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update_product(&mut self, product: &Product) -> CoreResult<()> {
        if product.quantity < 0 {
            return Err(CoreError::Storage(format!(
                "negative stock for '{}'",
                product.name
            )));
        }

        let taken = self
            .draft
            .products
            .values()
            .any(|p| p.id != product.id && p.name == product.name);
        if taken {
            return Err(CoreError::Conflict(format!(
                "product '{}' already exists",
                product.name
            )));
        }

        let stored = self
            .draft
            .products
            .get_mut(&product.id)
            .ok_or_else(|| CoreError::not_found(&product.name))?;
        stored.name = product.name.clone();
        stored.quantity = product.quantity;
        stored.price = product.price;
        stored.cost = product.cost;
        stored.updated_at = Utc::now();

        // Lines carry the name the way a join against products would
        for line in self.draft.basket.iter_mut().filter(|l| l.product_id == product.id) {
            line.product_name = product.name.clone();
        }
        Ok(())
    }

    async fn delete_product(&mut self, id: ProductId) -> CoreResult<()> {
        if self.draft.basket.iter().any(|l| l.product_id == id) {
            return Err(CoreError::Conflict(format!(
                "product #{} is referenced by the basket",
                id
            )));
        }
        self.draft
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found(format!("#{}", id)))
    }
}

#[async_trait]
impl BasketStore for MemoryWork {
    async fn basket_lines(&mut self) -> CoreResult<Vec<BasketLine>> {
        Ok(self.draft.basket.clone())
    }

    async fn save_basket_line(&mut self, line: &BasketLine) -> CoreResult<()> {
        if !self.draft.products.contains_key(&line.product_id) {
            return Err(CoreError::not_found(&line.product_name));
        }

        match self
            .draft
            .basket
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            Some(existing) => *existing = line.clone(),
            None => self.draft.basket.push(line.clone()),
        }
        Ok(())
    }

    async fn delete_basket_line(&mut self, product_id: ProductId) -> CoreResult<()> {
        self.draft.basket.retain(|l| l.product_id != product_id);
        Ok(())
    }

    async fn clear_basket(&mut self) -> CoreResult<()> {
        self.draft.basket.clear();
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for MemoryWork {
    async fn totals(&mut self) -> CoreResult<Totals> {
        Ok(self.draft.totals)
    }

    async fn add_revenue(&mut self, amount: Money) -> CoreResult<()> {
        self.draft.totals.revenue = accumulate("revenue", self.draft.totals.revenue, amount)?;
        Ok(())
    }

    async fn add_cost(&mut self, amount: Money) -> CoreResult<()> {
        self.draft.totals.cost = accumulate("cost", self.draft.totals.cost, amount)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryWork {
    async fn tax_rate(&mut self) -> CoreResult<TaxRate> {
        Ok(self.draft.tax_rate)
    }

    async fn set_tax_rate(&mut self, rate: TaxRate) -> CoreResult<()> {
        self.draft.tax_rate = rate;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryWork {
    async fn commit(self) -> CoreResult<()> {
        let MemoryWork { mut guard, draft } = self;
        *guard = draft;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn new_widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            quantity: 10,
            price: Money::from_cents(500),
            cost: Money::from_cents(200),
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_changes() {
        let store = MemoryStore::new();

        let mut work = store.begin().await.unwrap();
        let widget = work.insert_product(&new_widget()).await.unwrap();
        work.add_cost(Money::from_cents(2000)).await.unwrap();
        work.commit().await.unwrap();

        let mut work = store.begin().await.unwrap();
        assert_eq!(work.product_by_id(widget.id).await.unwrap(), Some(widget));
        assert_eq!(work.totals().await.unwrap().cost.cents(), 2000);
    }

    #[tokio::test]
    async fn test_drop_discards_changes() {
        let store = MemoryStore::new();

        {
            let mut work = store.begin().await.unwrap();
            work.insert_product(&new_widget()).await.unwrap();
            work.set_tax_rate(TaxRate::from_bps(500)).await.unwrap();
        }

        let mut work = store.begin().await.unwrap();
        assert!(work.list_products().await.unwrap().is_empty());
        assert_eq!(work.tax_rate().await.unwrap().bps(), 1900);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = MemoryStore::new();
        let mut work = store.begin().await.unwrap();

        work.insert_product(&new_widget()).await.unwrap();
        let err = work.insert_product(&new_widget()).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rename_checks_name_and_refreshes_basket() {
        let store = MemoryStore::new();
        let mut work = store.begin().await.unwrap();
        let mut widget = work.insert_product(&new_widget()).await.unwrap();
        let mut gadget_row = new_widget();
        gadget_row.name = "Gadget".to_string();
        work.insert_product(&gadget_row).await.unwrap();
        work.save_basket_line(&BasketLine {
            product_id: widget.id,
            product_name: widget.name.clone(),
            quantity: 1,
            unit_price: widget.price,
            subtotal: widget.price,
            added_at: Utc::now(),
        })
        .await
        .unwrap();

        widget.name = "Gadget".to_string();
        let err = work.update_product(&widget).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        widget.name = "Sprocket".to_string();
        work.update_product(&widget).await.unwrap();
        assert!(work.product_by_name("Widget").await.unwrap().is_none());
        assert_eq!(work.product_by_name("Sprocket").await.unwrap().map(|p| p.id), Some(widget.id));
        assert_eq!(work.basket_lines().await.unwrap()[0].product_name, "Sprocket");
    }

    #[tokio::test]
    async fn test_ledger_rejects_negative_amounts() {
        let store = MemoryStore::new();
        let mut work = store.begin().await.unwrap();

        assert!(work.add_revenue(Money::from_cents(-1)).await.is_err());
        assert!(work.add_cost(Money::from_cents(-1)).await.is_err());
        assert_eq!(work.totals().await.unwrap(), Totals::default());
    }

    #[tokio::test]
    async fn test_ledger_rejects_overflowing_total() {
        let store = MemoryStore::new();
        let mut work = store.begin().await.unwrap();
        work.add_cost(Money::from_cents(i64::MAX - 1)).await.unwrap();

        let err = work.add_cost(Money::from_cents(2)).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(work.totals().await.unwrap().cost.cents(), i64::MAX - 1);
    }

    #[tokio::test]
    async fn test_basket_line_upsert_keeps_position() {
        let store = MemoryStore::new();
        let mut work = store.begin().await.unwrap();
        let widget = work.insert_product(&new_widget()).await.unwrap();
        let mut gadget_row = new_widget();
        gadget_row.name = "Gadget".to_string();
        let gadget = work.insert_product(&gadget_row).await.unwrap();

        let line = |p: &Product, quantity: i64| BasketLine {
            product_id: p.id,
            product_name: p.name.clone(),
            quantity,
            unit_price: p.price,
            subtotal: p.price.checked_mul(quantity).unwrap(),
            added_at: Utc::now(),
        };

        work.save_basket_line(&line(&widget, 1)).await.unwrap();
        work.save_basket_line(&line(&gadget, 1)).await.unwrap();
        work.save_basket_line(&line(&widget, 4)).await.unwrap();

        let lines = work.basket_lines().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, widget.id);
        assert_eq!(lines[0].quantity, 4);

        let err = work.delete_product(widget.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }
}
