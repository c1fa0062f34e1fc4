//! Totals ledger reads.
//!
//! There is no write surface here: revenue grows only through
//! [`PointOfSale::commit`] and cost only through catalog restocks.

use super::PointOfSale;
use crate::error::CoreResult;
use crate::money::Money;
use crate::store::{LedgerStore, ProductStore, Store};
use crate::types::{Product, Totals, TotalsReport};

/// Ledger handle, borrowed from [`PointOfSale::ledger`].
pub struct Ledger<'a, S> {
    pub(super) pos: &'a PointOfSale<S>,
}

impl<'a, S: Store> Ledger<'a, S> {
    pub async fn totals(&self) -> CoreResult<Totals> {
        let mut work = self.pos.store.begin().await?;
        work.totals().await
    }

    pub async fn profit(&self) -> CoreResult<Money> {
        Ok(self.totals().await?.profit())
    }

    pub async fn margin_percent(&self) -> CoreResult<f64> {
        Ok(self.totals().await?.margin_percent())
    }

    /// Ledger figures plus stock value, read in one unit of work.
    pub async fn report(&self) -> CoreResult<TotalsReport> {
        let mut work = self.pos.store.begin().await?;
        let totals = work.totals().await?;
        let stock_value = work
            .list_products()
            .await?
            .iter()
            .map(Product::stock_value)
            .fold(Money::zero(), |sum, value| sum.saturating_add(value));

        Ok(TotalsReport {
            revenue: totals.revenue,
            cost: totals.cost,
            profit: totals.profit(),
            margin_percent: totals.margin_percent(),
            stock_value,
        })
    }
}
