//! # Basket Commands
//!
//! Every basket command answers with the whole basket, so the caller
//! can redraw its view from a single response.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  BASKET                                            2 lines     │
//! ├────────────────────────────────────────────────────────────────┤
//! │  Widget                  x3              $15.00               │
//! │  Gadget                  x1               $2.49               │
//! ├────────────────────────────────────────────────────────────────┤
//! │  Subtotal                                $17.49               │
//! │  Tax (19.00%)                             $3.32               │
//! │  TOTAL                                   $20.81               │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::{BasketSummary, ProductKey};

/// Adds `quantity` (default 1) of a product to the basket.
pub async fn add_to_basket<S: Store>(
    state: &AppState<S>,
    product: ProductKey,
    quantity: Option<i64>,
) -> Result<BasketSummary, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product = %product, quantity, "add_to_basket command");

    state.pos.basket().add(product, quantity).await?;
    get_basket(state).await
}

pub async fn remove_from_basket<S: Store>(
    state: &AppState<S>,
    product: ProductKey,
) -> Result<BasketSummary, ApiError> {
    debug!(product = %product, "remove_from_basket command");

    state.pos.basket().remove_line(product).await?;
    get_basket(state).await
}

pub async fn get_basket<S: Store>(state: &AppState<S>) -> Result<BasketSummary, ApiError> {
    Ok(state.pos.basket().summary().await?)
}

pub async fn clear_basket<S: Store>(state: &AppState<S>) -> Result<BasketSummary, ApiError> {
    state.pos.basket().clear().await?;
    get_basket(state).await
}
