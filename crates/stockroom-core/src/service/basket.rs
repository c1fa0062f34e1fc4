//! Current sale basket operations.

use chrono::Utc;
use tracing::{debug, info};

use super::{find_product, PointOfSale};
use crate::basket::Basket;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{BasketStore, SettingsStore, Store, UnitOfWork};
use crate::types::{BasketLine, BasketSummary, ProductKey};
use crate::validation::validate_quantity;

/// Basket handle, borrowed from [`PointOfSale::basket`].
pub struct CurrentSale<'a, S> {
    pub(super) pos: &'a PointOfSale<S>,
}

impl<'a, S: Store> CurrentSale<'a, S> {
    /// Adds `quantity` of a product, merging with its existing line.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the product does not exist
    /// - `InsufficientStock` if catalog stock is below `quantity`
    ///   (this add only; nothing is reserved)
    ///
    /// Returns the line as it now stands.
    pub async fn add(&self, product: impl Into<ProductKey>, quantity: i64) -> CoreResult<BasketLine> {
        let key = product.into();
        validate_quantity(quantity)?;
        debug!(product = %key, quantity, "add to basket");

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;

        let product = find_product(&mut work, &key).await?;
        let mut basket = Basket::from_lines(work.basket_lines().await?);
        let line = basket.add(&product, quantity, Utc::now())?.clone();

        work.save_basket_line(&line).await?;
        work.commit().await?;

        info!(
            product_id = line.product_id,
            quantity = line.quantity,
            subtotal = %line.subtotal,
            "Basket line updated"
        );
        Ok(line)
    }

    /// Drops one product's line.
    pub async fn remove_line(&self, product: impl Into<ProductKey>) -> CoreResult<BasketLine> {
        let key = product.into();
        debug!(product = %key, "remove basket line");

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;

        let removed = work
            .basket_lines()
            .await?
            .into_iter()
            .find(|l| match &key {
                ProductKey::Id(id) => l.product_id == *id,
                ProductKey::Name(name) => l.product_name == name.trim(),
            })
            .ok_or_else(|| CoreError::NotInBasket(key.to_string()))?;
        let product_id = removed.product_id;

        work.delete_basket_line(product_id).await?;
        work.commit().await?;

        info!(product_id, "Basket line removed");
        Ok(removed)
    }

    /// Lines in the order products first entered the basket.
    pub async fn list(&self) -> CoreResult<Vec<BasketLine>> {
        let mut work = self.pos.store.begin().await?;
        work.basket_lines().await
    }

    /// Σ line subtotals, tax-exclusive.
    pub async fn total(&self) -> CoreResult<Money> {
        Ok(Basket::from_lines(self.list().await?).subtotal())
    }

    /// Subtotal plus tax at the configured rate.
    pub async fn total_with_tax(&self) -> CoreResult<Money> {
        Ok(self.summary().await?.total)
    }

    /// Lines plus subtotal, tax and total, read in one unit of work.
    pub async fn summary(&self) -> CoreResult<BasketSummary> {
        let mut work = self.pos.store.begin().await?;
        let basket = Basket::from_lines(work.basket_lines().await?);
        let rate = work.tax_rate().await?;
        Ok(basket.summary(rate))
    }

    /// Empties the basket. Stock and ledger are untouched.
    pub async fn clear(&self) -> CoreResult<()> {
        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;
        work.clear_basket().await?;
        work.commit().await?;

        info!("Basket cleared");
        Ok(())
    }
}
