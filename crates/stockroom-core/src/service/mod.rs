//! # Point of Sale Service
//!
//! The single entry point for every catalog, basket, sale, ledger and tax
//! operation.
//!
//! ## Service Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PointOfSale<S: Store>                                │
//! │                                                                         │
//! │   ┌──────────┐  ┌────────────┐  ┌──────────┐  ┌──────────┐             │
//! │   │ catalog()│  │  basket()  │  │ ledger() │  │  tax()   │  commit()   │
//! │   │ restock  │  │  add       │  │ totals   │  │ get      │             │
//! │   │ get/list │  │  list      │  │ profit   │  │ set      │             │
//! │   │ remove   │  │  totals    │  │ report   │  │          │             │
//! │   └────┬─────┘  └─────┬──────┘  └────┬─────┘  └────┬─────┘             │
//! │        └──────────────┴──────┬───────┴─────────────┘                    │
//! │                              ▼                                          │
//! │                  writer: Mutex<()>   (mutations only)                   │
//! │                              ▼                                          │
//! │                  store.begin() ── UnitOfWork ── commit / drop           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Every mutation takes the writer lock, then runs in exactly one unit of
//! work. A commit's read-validate-write sequence therefore never
//! interleaves with a restock, an add or a tax change. Reads open their
//! own unit of work and never commit it.

mod basket;
mod catalog;
mod ledger;
mod sale;
mod tax;

pub use basket::CurrentSale;
pub use catalog::Catalog;
pub use ledger::Ledger;
pub use tax::TaxConfig;

use tokio::sync::{Mutex, MutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::store::{ProductStore, Store};
use crate::types::{CostPolicy, Product, ProductKey};

/// The point-of-sale core over a storage backend.
///
/// ## Usage
/// ```rust
/// use stockroom_core::memory::MemoryStore;
/// use stockroom_core::{CostInput, Money, PointOfSale};
///
/// # tokio_test_block(async {
/// let pos = PointOfSale::new(MemoryStore::new());
/// pos.catalog()
///     .restock("Widget", 10, Money::from_cents(500), CostInput::UnitCost(Money::from_cents(200)))
///     .await?;
/// pos.basket().add("Widget", 3).await?;
///
/// let sale = pos.commit().await?;
/// assert_eq!(sale.total.cents(), 1785);
/// # Ok::<(), stockroom_core::CoreError>(())
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct PointOfSale<S> {
    store: S,
    writer: Mutex<()>,
    cost_policy: CostPolicy,
}

impl<S: Store> PointOfSale<S> {
    /// Creates the service with the default (weighted-average) cost policy.
    pub fn new(store: S) -> Self {
        PointOfSale {
            store,
            writer: Mutex::new(()),
            cost_policy: CostPolicy::default(),
        }
    }

    pub fn with_cost_policy(mut self, policy: CostPolicy) -> Self {
        self.cost_policy = policy;
        self
    }

    pub fn cost_policy(&self) -> CostPolicy {
        self.cost_policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> Catalog<'_, S> {
        Catalog { pos: self }
    }

    pub fn basket(&self) -> CurrentSale<'_, S> {
        CurrentSale { pos: self }
    }

    pub fn ledger(&self) -> Ledger<'_, S> {
        Ledger { pos: self }
    }

    pub fn tax(&self) -> TaxConfig<'_, S> {
        TaxConfig { pos: self }
    }

    /// Serializes mutations. Held across the whole unit of work.
    async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }
}

/// Resolves a name-or-id to a product inside a unit of work.
async fn find_product<W: ProductStore>(work: &mut W, key: &ProductKey) -> CoreResult<Product> {
    let found = match key {
        ProductKey::Id(id) => work.product_by_id(*id).await?,
        ProductKey::Name(name) => work.product_by_name(name.trim()).await?,
    };
    found.ok_or_else(|| CoreError::not_found(key))
}

// =============================================================================
// Service Tests
// =============================================================================
//
// End-to-end behavior across catalog, basket, sale and ledger, run against
// the in-memory store. stockroom-db runs the same scenarios on SQLite.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::money::Money;
    use crate::types::{CostInput, Percentage};

    fn unit_cost(cents: i64) -> CostInput {
        CostInput::UnitCost(Money::from_cents(cents))
    }

    fn pos() -> PointOfSale<MemoryStore> {
        PointOfSale::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_end_to_end_sale() {
        let pos = pos();

        pos.catalog()
            .restock("Widget", 10, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        assert_eq!(pos.ledger().totals().await.unwrap().cost.cents(), 2000);

        let line = pos.basket().add("Widget", 3).await.unwrap();
        assert_eq!(line.subtotal.cents(), 1500);

        let sale = pos.commit().await.unwrap();
        assert_eq!(sale.subtotal.cents(), 1500);
        assert_eq!(sale.tax.cents(), 285);
        assert_eq!(sale.total.cents(), 1785);
        assert_eq!(sale.line_count, 1);

        let widget = pos.catalog().get("Widget").await.unwrap();
        assert_eq!(widget.quantity, 7);
        assert_eq!(pos.ledger().totals().await.unwrap().revenue.cents(), 1500);
        assert!(pos.basket().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_restock_weighted_average() {
        let pos = pos();
        let catalog = pos.catalog();

        let id = catalog
            .restock("Widget", 10, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        let again = catalog
            .restock("Widget", 10, Money::from_cents(550), unit_cost(300))
            .await
            .unwrap();
        assert_eq!(id, again);

        let widget = catalog.get(id).await.unwrap();
        assert_eq!(widget.quantity, 20);
        assert_eq!(widget.price.cents(), 550);
        assert_eq!(widget.cost.cents(), 250);
        assert_eq!(pos.ledger().totals().await.unwrap().cost.cents(), 5000);
    }

    #[tokio::test]
    async fn test_restock_overwrite_policy() {
        let pos = PointOfSale::new(MemoryStore::new()).with_cost_policy(CostPolicy::Overwrite);
        let catalog = pos.catalog();

        catalog
            .restock("Widget", 10, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        catalog
            .restock("Widget", 10, Money::from_cents(500), unit_cost(300))
            .await
            .unwrap();

        let widget = catalog.get("Widget").await.unwrap();
        assert_eq!(widget.quantity, 20);
        assert_eq!(widget.cost.cents(), 300);
        assert_eq!(pos.ledger().totals().await.unwrap().cost.cents(), 5000);
    }

    #[tokio::test]
    async fn test_restock_with_margin() {
        let pos = pos();

        pos.catalog()
            .restock(
                "Widget",
                4,
                Money::from_cents(500),
                CostInput::Margin(Percentage::from_bps(2500)),
            )
            .await
            .unwrap();

        let widget = pos.catalog().get("Widget").await.unwrap();
        assert_eq!(widget.cost.cents(), 400);
        assert_eq!(pos.ledger().totals().await.unwrap().cost.cents(), 1600);
    }

    #[tokio::test]
    async fn test_restock_validation_leaves_state_untouched() {
        let pos = pos();
        let catalog = pos.catalog();

        for (name, qty, price, cost) in [
            ("", 1, 500, 200),
            ("Widget", 0, 500, 200),
            ("Widget", 1, 0, 200),
            ("Widget", 1, 500, 0),
        ] {
            let err = catalog
                .restock(name, qty, Money::from_cents(price), unit_cost(cost))
                .await
                .unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{:?}", err);
        }

        assert!(catalog.list_all().await.unwrap().is_empty());
        assert_eq!(pos.ledger().totals().await.unwrap().cost.cents(), 0);
    }

    #[tokio::test]
    async fn test_commit_is_atomic() {
        let pos = pos();
        let catalog = pos.catalog();
        catalog
            .restock("Widget", 10, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        catalog
            .restock("Gadget", 5, Money::from_cents(300), unit_cost(100))
            .await
            .unwrap();

        pos.basket().add("Widget", 2).await.unwrap();
        pos.basket().add("Gadget", 3).await.unwrap();
        // Repeat add passes the per-add check but overdraws at commit
        pos.basket().add("Gadget", 3).await.unwrap();

        let before = pos.ledger().totals().await.unwrap();
        let err = pos.commit().await.unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product,
                available,
                requested,
            } => {
                assert_eq!(product, "Gadget");
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(catalog.get("Widget").await.unwrap().quantity, 10);
        assert_eq!(catalog.get("Gadget").await.unwrap().quantity, 5);
        assert_eq!(pos.ledger().totals().await.unwrap(), before);
        assert_eq!(pos.basket().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_repeat_add_uses_current_price() {
        let pos = pos();
        let catalog = pos.catalog();
        catalog
            .restock("Widget", 5, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        pos.basket().add("Widget", 2).await.unwrap();

        catalog
            .restock("Widget", 1, Money::from_cents(600), unit_cost(200))
            .await
            .unwrap();
        let line = pos.basket().add("Widget", 1).await.unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price.cents(), 600);
        assert_eq!(line.subtotal.cents(), 1800);

        let sale = pos.commit().await.unwrap();
        assert_eq!(sale.subtotal.cents(), 1800);
        assert_eq!(catalog.get("Widget").await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_empty_commit_fails() {
        let pos = pos();
        let err = pos.commit().await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyBasket));
        assert_eq!(pos.ledger().totals().await.unwrap().revenue.cents(), 0);
    }

    #[tokio::test]
    async fn test_stock_never_negative() {
        let pos = pos();
        pos.catalog()
            .restock("Widget", 5, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();

        for _ in 0..10 {
            let _ = pos.basket().add("Widget", 2).await;
            let _ = pos.commit().await;
            let _ = pos.basket().clear().await;
            let widget = pos.catalog().get("Widget").await.unwrap();
            assert!(widget.quantity >= 0);
        }

        let widget = pos.catalog().get("Widget").await.unwrap();
        assert_eq!(widget.quantity, 1);
        assert_eq!(pos.ledger().totals().await.unwrap().revenue.cents(), 2000);
    }

    #[tokio::test]
    async fn test_ledger_is_monotonic() {
        let pos = pos();
        let mut last = pos.ledger().totals().await.unwrap();

        pos.catalog()
            .restock("Widget", 10, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        for qty in [1, 4, 20, 2] {
            let _ = pos.basket().add("Widget", qty).await;
            let _ = pos.commit().await;

            let now = pos.ledger().totals().await.unwrap();
            assert!(now.revenue >= last.revenue);
            assert!(now.cost >= last.cost);
            last = now;
        }
    }

    #[tokio::test]
    async fn test_remove_product_in_basket_conflicts() {
        let pos = pos();
        pos.catalog()
            .restock("Widget", 5, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        pos.basket().add("Widget", 1).await.unwrap();

        let err = pos.catalog().remove("Widget").await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        pos.basket().clear().await.unwrap();
        pos.catalog().remove("Widget").await.unwrap();
        assert!(matches!(
            pos.catalog().get("Widget").await,
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_commits_do_not_oversell() {
        let pos = std::sync::Arc::new(pos());
        pos.catalog()
            .restock("Widget", 1, Money::from_cents(500), unit_cost(200))
            .await
            .unwrap();
        pos.basket().add("Widget", 1).await.unwrap();

        let a = tokio::spawn({
            let pos = pos.clone();
            async move { pos.commit().await }
        });
        let b = tokio::spawn({
            let pos = pos.clone();
            async move { pos.commit().await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(pos.catalog().get("Widget").await.unwrap().quantity, 0);
        assert_eq!(pos.ledger().totals().await.unwrap().revenue.cents(), 500);
    }
}
