//! Product catalog operations.

use chrono::Utc;
use tracing::{debug, info};

use super::{find_product, PointOfSale};
use crate::error::{CoreError, CoreResult};
use crate::inventory::{plan_restock, remaining_after};
use crate::money::Money;
use crate::store::{BasketStore, LedgerStore, ProductStore, Store, UnitOfWork};
use crate::types::{CostInput, NewProduct, Product, ProductEdit, ProductId, ProductKey};
use crate::validation::{validate_cost, validate_price, validate_product_name, validate_quantity};

/// Catalog handle, borrowed from [`PointOfSale::catalog`].
pub struct Catalog<'a, S> {
    pub(super) pos: &'a PointOfSale<S>,
}

impl<'a, S: Store> Catalog<'a, S> {
    /// Adds stock under `name`, creating the product on first sight.
    ///
    /// ## Behavior
    /// ```text
    /// existing: quantity += qty, price = price, cost = policy(old, new)
    /// unseen:   new product { qty, price, cost }
    /// both:     ledger cost += qty × cost
    /// ```
    ///
    /// Returns the product id.
    pub async fn restock(
        &self,
        name: &str,
        quantity: i64,
        price: Money,
        cost: CostInput,
    ) -> CoreResult<ProductId> {
        let name = validate_product_name(name)?;
        validate_quantity(quantity)?;
        validate_price(price)?;
        let unit_cost = cost.resolve(price)?;

        debug!(name = %name, quantity, price = %price, cost = %unit_cost, "restock");

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;

        let existing = work.product_by_name(&name).await?;
        let plan = plan_restock(
            existing.as_ref(),
            quantity,
            price,
            unit_cost,
            self.pos.cost_policy,
        )?;

        let id = match existing {
            Some(mut product) => {
                product.quantity = plan.quantity;
                product.price = plan.price;
                product.cost = plan.cost;
                work.update_product(&product).await?;
                product.id
            }
            None => {
                let created = work
                    .insert_product(&NewProduct {
                        name: name.clone(),
                        quantity: plan.quantity,
                        price: plan.price,
                        cost: plan.cost,
                    })
                    .await?;
                created.id
            }
        };

        work.add_cost(plan.ledger_cost).await?;
        work.commit().await?;

        info!(
            product_id = id,
            name = %name,
            quantity = plan.quantity,
            cost = %plan.cost,
            ledger_cost = %plan.ledger_cost,
            "Product restocked"
        );
        Ok(id)
    }

    /// Looks a product up by name or id.
    pub async fn get(&self, key: impl Into<ProductKey>) -> CoreResult<Product> {
        let key = key.into();
        let mut work = self.pos.store.begin().await?;
        find_product(&mut work, &key).await
    }

    /// Id of the product called `name`.
    pub async fn find_id(&self, name: &str) -> CoreResult<ProductId> {
        Ok(self.get(name).await?.id)
    }

    /// Every product in id order.
    pub async fn list_all(&self) -> CoreResult<Vec<Product>> {
        let mut work = self.pos.store.begin().await?;
        work.list_products().await
    }

    /// Renames or reprices a product in place.
    ///
    /// ## Behavior
    /// ```text
    /// name?  → trimmed, validated, must not belong to another product
    /// price? → validated, used by the next basket add (lines keep theirs)
    /// cost?  → validated, replaces the carried unit cost
    /// ```
    /// Quantity and the ledger are untouched. An empty edit returns the
    /// product unchanged.
    pub async fn update(&self, key: impl Into<ProductKey>, edit: ProductEdit) -> CoreResult<Product> {
        let key = key.into();
        let name = edit.name.as_deref().map(validate_product_name).transpose()?;
        if let Some(price) = edit.price {
            validate_price(price)?;
        }
        if let Some(cost) = edit.cost {
            validate_cost(cost)?;
        }
        debug!(product = %key, ?name, price = ?edit.price, cost = ?edit.cost, "update product");

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;

        let mut product = find_product(&mut work, &key).await?;
        if edit.is_empty() {
            return Ok(product);
        }

        if let Some(name) = name {
            if name != product.name {
                if let Some(other) = work.product_by_name(&name).await? {
                    return Err(CoreError::Conflict(format!(
                        "product '{}' already exists (#{})",
                        other.name, other.id
                    )));
                }
            }
            product.name = name;
        }
        product.price = edit.price.unwrap_or(product.price);
        product.cost = edit.cost.unwrap_or(product.cost);
        product.updated_at = Utc::now();

        work.update_product(&product).await?;
        work.commit().await?;

        info!(
            product_id = product.id,
            name = %product.name,
            price = %product.price,
            cost = %product.cost,
            "Product updated"
        );
        Ok(product)
    }

    /// Deletes a product permanently.
    ///
    /// Refused with `Conflict` while the current basket holds the product;
    /// clear or drop that line first.
    pub async fn remove(&self, key: impl Into<ProductKey>) -> CoreResult<()> {
        let key = key.into();
        debug!(product = %key, "remove product");

        let _writer = self.pos.write_lock().await;
        let mut work = self.pos.store.begin().await?;

        let product = find_product(&mut work, &key).await?;
        let in_basket = work
            .basket_lines()
            .await?
            .iter()
            .any(|l| l.product_id == product.id);
        if in_basket {
            return Err(CoreError::Conflict(format!(
                "'{}' is in the current basket",
                product.name
            )));
        }

        work.delete_product(product.id).await?;
        work.commit().await?;

        info!(product_id = product.id, name = %product.name, "Product removed");
        Ok(())
    }

    /// Σ quantity × cost over the catalog, clamped to the i64 range.
    pub async fn stock_value(&self) -> CoreResult<Money> {
        Ok(self
            .list_all()
            .await?
            .iter()
            .map(Product::stock_value)
            .fold(Money::zero(), |sum, value| sum.saturating_add(value)))
    }
}

/// Takes `quantity` units of `product` inside the caller's unit of work.
///
/// Only the sale engine calls this, after it has validated every line.
pub(super) async fn decrement_stock<W: UnitOfWork>(
    work: &mut W,
    product: &Product,
    quantity: i64,
) -> CoreResult<()> {
    let remaining = remaining_after(product, quantity)?;
    let updated = Product {
        quantity: remaining,
        updated_at: Utc::now(),
        ..product.clone()
    };
    work.update_product(&updated).await
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryStore;
    use crate::money::Money;
    use crate::types::{CostInput, ProductEdit};
    use crate::{CoreError, PointOfSale, MAX_QUANTITY};

    #[tokio::test]
    async fn test_get_by_name_and_id() {
        let pos = PointOfSale::new(MemoryStore::new());
        let catalog = pos.catalog();
        let id = catalog
            .restock("  Widget ", 1, Money::from_cents(500), CostInput::UnitCost(Money::from_cents(200)))
            .await
            .unwrap();

        assert_eq!(catalog.get("Widget").await.unwrap().id, id);
        assert_eq!(catalog.get(id).await.unwrap().name, "Widget");
        assert_eq!(catalog.find_id("Widget").await.unwrap(), id);
        assert!(matches!(
            catalog.get("Gadget").await,
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let pos = PointOfSale::new(MemoryStore::new());
        let catalog = pos.catalog();
        for name in ["Widget", "Gadget", "Bolt"] {
            catalog
                .restock(name, 2, Money::from_cents(100), CostInput::UnitCost(Money::from_cents(50)))
                .await
                .unwrap();
        }

        let names: Vec<_> = catalog
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Widget", "Gadget", "Bolt"]);
        assert_eq!(catalog.stock_value().await.unwrap().cents(), 300);
    }

    #[tokio::test]
    async fn test_restock_past_quantity_limit_is_rejected() {
        let pos = PointOfSale::new(MemoryStore::new());
        let catalog = pos.catalog();
        let cost = CostInput::UnitCost(Money::from_cents(200));

        let err = catalog
            .restock("Widget", i64::MAX / 2, Money::from_cents(500), cost)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(catalog.list_all().await.unwrap().is_empty());

        catalog
            .restock("Widget", MAX_QUANTITY, Money::from_cents(500), cost)
            .await
            .unwrap();
        let err = catalog
            .restock("Widget", 1, Money::from_cents(500), cost)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // The failed restock left stock and ledger as they were
        assert_eq!(catalog.get("Widget").await.unwrap().quantity, MAX_QUANTITY);
        assert_eq!(
            pos.ledger().totals().await.unwrap().cost.cents(),
            200 * MAX_QUANTITY
        );
    }

    #[tokio::test]
    async fn test_update_renames_and_reprices() {
        let pos = PointOfSale::new(MemoryStore::new());
        let catalog = pos.catalog();
        let id = catalog
            .restock("Widget", 4, Money::from_cents(500), CostInput::UnitCost(Money::from_cents(200)))
            .await
            .unwrap();
        pos.basket().add("Widget", 1).await.unwrap();
        let ledger_before = pos.ledger().totals().await.unwrap();

        let updated = catalog
            .update(
                id,
                ProductEdit {
                    name: Some("  Sprocket ".to_string()),
                    price: Some(Money::from_cents(650)),
                    cost: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Sprocket");
        assert_eq!(updated.price.cents(), 650);
        assert_eq!(updated.cost.cents(), 200);
        assert_eq!(updated.quantity, 4);
        assert!(catalog.get("Widget").await.is_err());
        assert_eq!(catalog.get("Sprocket").await.unwrap().id, id);
        assert_eq!(pos.ledger().totals().await.unwrap(), ledger_before);

        // Basket lines follow the name but keep their frozen price
        let lines = pos.basket().list().await.unwrap();
        assert_eq!(lines[0].product_name, "Sprocket");
        assert_eq!(lines[0].unit_price.cents(), 500);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_name_and_bad_amounts() {
        let pos = PointOfSale::new(MemoryStore::new());
        let catalog = pos.catalog();
        for name in ["Widget", "Gadget"] {
            catalog
                .restock(name, 1, Money::from_cents(500), CostInput::UnitCost(Money::from_cents(200)))
                .await
                .unwrap();
        }

        let rename = ProductEdit {
            name: Some("Gadget".to_string()),
            ..ProductEdit::default()
        };
        assert!(matches!(
            catalog.update("Widget", rename).await,
            Err(CoreError::Conflict(_))
        ));

        let free = ProductEdit {
            price: Some(Money::zero()),
            ..ProductEdit::default()
        };
        assert!(matches!(
            catalog.update("Widget", free).await,
            Err(CoreError::Validation(_))
        ));

        let blank = ProductEdit {
            name: Some("   ".to_string()),
            ..ProductEdit::default()
        };
        assert!(matches!(
            catalog.update("Widget", blank).await,
            Err(CoreError::Validation(_))
        ));

        // Keeping its own name is not a conflict
        let same = ProductEdit {
            name: Some("Widget".to_string()),
            cost: Some(Money::from_cents(250)),
            ..ProductEdit::default()
        };
        assert_eq!(catalog.update("Widget", same).await.unwrap().cost.cents(), 250);

        assert!(matches!(
            catalog.update("Bolt", ProductEdit::default()).await,
            Err(CoreError::ProductNotFound(_))
        ));
        let widget = catalog.get("Widget").await.unwrap();
        assert_eq!(catalog.update("Widget", ProductEdit::default()).await.unwrap(), widget);
    }

    #[tokio::test]
    async fn test_remove_missing_product() {
        let pos = PointOfSale::new(MemoryStore::new());
        assert!(matches!(
            pos.catalog().remove(42i64).await,
            Err(CoreError::ProductNotFound(_))
        ));
    }
}
