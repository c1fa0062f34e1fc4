//! # Sale Transaction Engine
//!
//! Turns the current basket into a committed sale.
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit()                                                               │
//! │     │                                                                   │
//! │     ├── writer lock + begin unit of work                               │
//! │     │                                                                   │
//! │     ├── basket empty? ─────────────────────► EmptyBasket               │
//! │     │                                                                   │
//! │     ├── VALIDATE every line (insertion order, current stock)           │
//! │     │     product gone?  ──────────────────► ProductNotFound           │
//! │     │     stock < qty?   ──────────────────► InsufficientStock         │
//! │     │                                                                   │
//! │     ├── APPLY every decrement                                          │
//! │     ├── subtotal = Σ line subtotals, tax on subtotal                   │
//! │     ├── ledger revenue += subtotal (tax-exclusive)                     │
//! │     ├── clear basket                                                    │
//! │     └── commit unit of work ───────────────► CommittedSale             │
//! │                                                                         │
//! │  Any error before the last step drops the unit of work: catalog,       │
//! │  ledger and basket stay exactly as they were.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use super::catalog::decrement_stock;
use super::PointOfSale;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{BasketStore, LedgerStore, ProductStore, SettingsStore, Store, UnitOfWork};
use crate::types::{CommittedSale, Product};

impl<S: Store> PointOfSale<S> {
    /// Commits the current basket as one sale.
    pub async fn commit(&self) -> CoreResult<CommittedSale> {
        let _writer = self.write_lock().await;

        match self.commit_locked().await {
            Ok(sale) => {
                info!(
                    lines = sale.line_count,
                    subtotal = %sale.subtotal,
                    tax = %sale.tax,
                    total = %sale.total,
                    "Sale committed"
                );
                Ok(sale)
            }
            Err(e) => {
                warn!(error = %e, "Sale commit aborted");
                Err(e)
            }
        }
    }

    async fn commit_locked(&self) -> CoreResult<CommittedSale> {
        let mut work = self.store.begin().await?;

        let lines = work.basket_lines().await?;
        if lines.is_empty() {
            return Err(CoreError::EmptyBasket);
        }
        debug!(lines = lines.len(), "commit: validating basket");

        // Validate everything before touching anything
        let mut checked: Vec<(Product, i64)> = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = work
                .product_by_id(line.product_id)
                .await?
                .ok_or_else(|| CoreError::not_found(&line.product_name))?;

            if !product.can_supply(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    product: product.name,
                    available: product.quantity,
                    requested: line.quantity,
                });
            }
            checked.push((product, line.quantity));
        }

        for (product, quantity) in &checked {
            decrement_stock(&mut work, product, *quantity).await?;
        }

        let subtotal = lines
            .iter()
            .try_fold(Money::zero(), |sum, l| sum.checked_add(l.subtotal))
            .ok_or_else(|| CoreError::out_of_range("subtotal", 0, i64::MAX))?;
        let tax_rate = work.tax_rate().await?;
        let tax = subtotal.calculate_tax(tax_rate);

        work.add_revenue(subtotal).await?;
        work.clear_basket().await?;
        work.commit().await?;

        Ok(CommittedSale {
            subtotal,
            tax,
            total: subtotal + tax,
            line_count: lines.len(),
            tax_rate,
            lines,
            committed_at: Utc::now(),
        })
    }
}
