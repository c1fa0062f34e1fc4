//! # Sale Commands
//!
//! ## Commit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"command":"commit_sale"}                                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PointOfSale::commit()                                                  │
//! │   1. Basket empty?             ──► EMPTY_BASKET                         │
//! │   2. Every line still in stock? ──► INSUFFICIENT_STOCK (nothing changes)│
//! │   3. Decrement stock, add revenue, clear basket (one transaction)       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  CommittedSale { subtotal, tax, total, lines, ... }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::CommittedSale;

pub async fn commit_sale<S: Store>(state: &AppState<S>) -> Result<CommittedSale, ApiError> {
    let sale = state.pos.commit().await?;
    info!(total = %sale.total, lines = sale.line_count, "commit_sale command");
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;
    use stockroom_core::{CostInput, Money};

    #[tokio::test]
    async fn test_commit_sale() {
        let state = test_support::state().await;
        let cost = CostInput::UnitCost(Money::from_cents(200));
        state
            .pos
            .catalog()
            .restock("Widget", 10, Money::from_cents(500), cost)
            .await
            .unwrap();
        state.pos.basket().add("Widget", 3).await.unwrap();

        let sale = commit_sale(&state).await.unwrap();
        assert_eq!(sale.total.cents(), 1785);
        assert_eq!(sale.lines.len(), 1);

        let err = commit_sale(&state).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyBasket);
    }
}
