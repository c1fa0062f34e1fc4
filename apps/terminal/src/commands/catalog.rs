//! # Catalog Commands
//!
//! Restock, lookup, editing and removal of products.
//!
//! ## Restock Request
//! ```text
//! {"command":"restock","name":"Widget","quantity":10,"price":500,"unitCost":200}
//! {"command":"restock","name":"Widget","quantity":10,"price":500,"margin":25.0}
//!                                                     cents ──┘      └── percent
//! ```
//! Exactly one of `unitCost` and `margin` must be present.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::validation::percentage_from_decimal;
use stockroom_core::{CostInput, Money, Product, ProductEdit, ProductKey};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockArgs {
    pub name: String,
    pub quantity: i64,
    /// Unit sale price in cents.
    pub price: Money,
    /// Unit cost in cents.
    pub unit_cost: Option<Money>,
    /// Markup over cost as a decimal percentage.
    pub margin: Option<f64>,
}

impl RestockArgs {
    fn cost_input(&self) -> Result<CostInput, ApiError> {
        match (self.unit_cost, self.margin) {
            (Some(cost), None) => Ok(CostInput::UnitCost(cost)),
            (None, Some(margin)) => Ok(CostInput::Margin(percentage_from_decimal(
                "margin", margin,
            )?)),
            (Some(_), Some(_)) => Err(ApiError::validation(
                "give either unitCost or margin, not both",
            )),
            (None, None) => Err(ApiError::validation("unitCost or margin is required")),
        }
    }
}

/// Restock result: the product as it now stands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockResponse {
    pub product_id: i64,
    pub product: Product,
}

pub async fn restock<S: Store>(
    state: &AppState<S>,
    args: RestockArgs,
) -> Result<RestockResponse, ApiError> {
    debug!(name = %args.name, quantity = args.quantity, "restock command");

    let cost = args.cost_input()?;
    let catalog = state.pos.catalog();
    let product_id = catalog
        .restock(&args.name, args.quantity, args.price, cost)
        .await?;
    let product = catalog.get(product_id).await?;

    Ok(RestockResponse {
        product_id,
        product,
    })
}

pub async fn get_product<S: Store>(
    state: &AppState<S>,
    product: ProductKey,
) -> Result<Product, ApiError> {
    Ok(state.pos.catalog().get(product).await?)
}

pub async fn list_products<S: Store>(state: &AppState<S>) -> Result<Vec<Product>, ApiError> {
    Ok(state.pos.catalog().list_all().await?)
}

/// Renames or reprices a product and returns it as it now stands.
pub async fn update_product<S: Store>(
    state: &AppState<S>,
    product: ProductKey,
    edit: ProductEdit,
) -> Result<Product, ApiError> {
    debug!(product = %product, "update_product command");

    Ok(state.pos.catalog().update(product, edit).await?)
}

/// Removes a product and returns what was removed.
pub async fn remove_product<S: Store>(
    state: &AppState<S>,
    product: ProductKey,
) -> Result<Product, ApiError> {
    debug!(product = %product, "remove_product command");

    let catalog = state.pos.catalog();
    let removed = catalog.get(product).await?;
    catalog.remove(removed.id).await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use crate::error::ErrorCode;

    fn args(unit_cost: Option<i64>, margin: Option<f64>) -> RestockArgs {
        RestockArgs {
            name: "Widget".to_string(),
            quantity: 4,
            price: Money::from_cents(1250),
            unit_cost: unit_cost.map(Money::from_cents),
            margin,
        }
    }

    #[tokio::test]
    async fn test_restock_with_margin() {
        let state = test_support::state().await;

        let response = restock(&state, args(None, Some(25.0))).await.unwrap();
        assert_eq!(response.product.quantity, 4);
        // 12.50 / 1.25
        assert_eq!(response.product.cost.cents(), 1000);
    }

    #[tokio::test]
    async fn test_restock_needs_exactly_one_cost() {
        let state = test_support::state().await;

        let err = restock(&state, args(None, None)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = restock(&state, args(Some(100), Some(10.0))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(list_products(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_and_remove_product() {
        let state = test_support::state().await;
        let id = restock(&state, args(Some(600), None))
            .await
            .unwrap()
            .product_id;

        let by_id = get_product(&state, ProductKey::Id(id)).await.unwrap();
        let by_name = get_product(&state, "Widget".into()).await.unwrap();
        assert_eq!(by_id, by_name);

        let removed = remove_product(&state, "Widget".into()).await.unwrap();
        assert_eq!(removed.id, id);

        let err = get_product(&state, ProductKey::Id(id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_product() {
        let state = test_support::state().await;
        let id = restock(&state, args(Some(600), None))
            .await
            .unwrap()
            .product_id;
        restock(
            &state,
            RestockArgs {
                name: "Gadget".to_string(),
                ..args(Some(300), None)
            },
        )
        .await
        .unwrap();

        let edit = ProductEdit {
            name: Some("Sprocket".to_string()),
            price: Some(Money::from_cents(1500)),
            cost: None,
        };
        let updated = update_product(&state, ProductKey::Id(id), edit).await.unwrap();
        assert_eq!(updated.name, "Sprocket");
        assert_eq!(updated.price.cents(), 1500);
        assert_eq!(updated.cost.cents(), 600);

        let clash = ProductEdit {
            name: Some("Gadget".to_string()),
            ..ProductEdit::default()
        };
        let err = update_product(&state, "Sprocket".into(), clash).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = update_product(&state, "Widget".into(), ProductEdit::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
