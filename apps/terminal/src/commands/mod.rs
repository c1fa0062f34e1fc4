//! # Commands Module
//!
//! Every request the terminal understands, and the dispatcher.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Request enum, dispatch)
//! ├── catalog.rs  ◄─── restock, get_product, list_products, update_product,
//! │                    remove_product
//! ├── basket.rs   ◄─── add_to_basket, remove_from_basket, get_basket, clear_basket
//! ├── sale.rs     ◄─── commit_sale
//! ├── ledger.rs   ◄─── get_totals
//! ├── tax.rs      ◄─── get_tax, set_tax
//! └── config.rs   ◄─── get_config
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin line                                                             │
//! │  {"command":"add_to_basket","product":"Widget","quantity":3}           │
//! │         │                                                               │
//! │         │ serde_json::from_str::<Request>                               │
//! │         ▼                                                               │
//! │  Request::AddToBasket { product, quantity }                             │
//! │         │                                                               │
//! │         │ dispatch(&state, request)                                     │
//! │         ▼                                                               │
//! │  basket::add_to_basket(&state, product, quantity)                       │
//! │     -> Result<BasketSummary, ApiError>                                  │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout line                                                            │
//! │  {"ok":true,"data":{"lines":[...],"subtotal":1500,...}}                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod basket;
pub mod catalog;
pub mod config;
pub mod ledger;
pub mod sale;
pub mod tax;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::{Money, ProductEdit, ProductKey};

/// One request line.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Restock(catalog::RestockArgs),
    GetProduct {
        product: ProductKey,
    },
    ListProducts,
    /// Absent fields are left as they are.
    UpdateProduct {
        product: ProductKey,
        name: Option<String>,
        price: Option<Money>,
        cost: Option<Money>,
    },
    RemoveProduct {
        product: ProductKey,
    },
    AddToBasket {
        product: ProductKey,
        quantity: Option<i64>,
    },
    RemoveFromBasket {
        product: ProductKey,
    },
    GetBasket,
    ClearBasket,
    CommitSale,
    GetTotals,
    GetTax,
    SetTax {
        percent: f64,
    },
    GetConfig,
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Restock(_) => "restock",
            Request::GetProduct { .. } => "get_product",
            Request::ListProducts => "list_products",
            Request::UpdateProduct { .. } => "update_product",
            Request::RemoveProduct { .. } => "remove_product",
            Request::AddToBasket { .. } => "add_to_basket",
            Request::RemoveFromBasket { .. } => "remove_from_basket",
            Request::GetBasket => "get_basket",
            Request::ClearBasket => "clear_basket",
            Request::CommitSale => "commit_sale",
            Request::GetTotals => "get_totals",
            Request::GetTax => "get_tax",
            Request::SetTax { .. } => "set_tax",
            Request::GetConfig => "get_config",
        }
    }
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Response {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

impl From<Result<Value, ApiError>> for Response {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Response::success(data),
            Err(error) => Response::failure(error),
        }
    }
}

fn to_data<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

/// Runs one request against the state.
pub async fn dispatch<S: Store>(state: &AppState<S>, request: Request) -> Result<Value, ApiError> {
    debug!(command = request.name(), "dispatch");

    match request {
        Request::Restock(args) => to_data(catalog::restock(state, args).await?),
        Request::GetProduct { product } => to_data(catalog::get_product(state, product).await?),
        Request::ListProducts => to_data(catalog::list_products(state).await?),
        Request::UpdateProduct {
            product,
            name,
            price,
            cost,
        } => {
            let edit = ProductEdit { name, price, cost };
            to_data(catalog::update_product(state, product, edit).await?)
        }
        Request::RemoveProduct { product } => {
            to_data(catalog::remove_product(state, product).await?)
        }
        Request::AddToBasket { product, quantity } => {
            to_data(basket::add_to_basket(state, product, quantity).await?)
        }
        Request::RemoveFromBasket { product } => {
            to_data(basket::remove_from_basket(state, product).await?)
        }
        Request::GetBasket => to_data(basket::get_basket(state).await?),
        Request::ClearBasket => to_data(basket::clear_basket(state).await?),
        Request::CommitSale => to_data(sale::commit_sale(state).await?),
        Request::GetTotals => to_data(ledger::get_totals(state).await?),
        Request::GetTax => to_data(tax::get_tax(state).await?),
        Request::SetTax { percent } => to_data(tax::set_tax(state, percent).await?),
        Request::GetConfig => to_data(config::get_config(state)),
    }
}

/// Parses and runs one input line. Never fails: errors become responses.
pub async fn handle_line<S: Store>(state: &AppState<S>, line: &str) -> Response {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected request line");
            return Response::failure(ApiError::invalid_request(e.to_string()));
        }
    };

    let name = request.name();
    let result = dispatch(state, request).await;
    if let Err(ref e) = result {
        warn!(command = name, code = ?e.code, "{}", e.message);
    }
    result.into()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::AppConfig;
    use crate::state::AppState;
    use std::path::PathBuf;
    use stockroom_core::CostPolicy;
    use stockroom_db::Database;

    pub async fn state() -> AppState<Database> {
        let config = AppConfig {
            database_path: PathBuf::from(stockroom_db::IN_MEMORY_PATH),
            cost_policy: CostPolicy::WeightedAverage,
            max_connections: 1,
            config_file: None,
        };
        let db = Database::in_memory().await.unwrap();
        AppState::new(db, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_full_session_over_lines() {
        let state = test_support::state().await;

        let lines = [
            r#"{"command":"restock","name":"Widget","quantity":10,"price":500,"unitCost":200}"#,
            r#"{"command":"add_to_basket","product":"Widget","quantity":3}"#,
            r#"{"command":"commit_sale"}"#,
        ];
        let mut responses = Vec::new();
        for line in lines {
            responses.push(handle_line(&state, line).await);
        }
        assert!(responses.iter().all(|r| r.ok));

        let sale = responses[2].data.as_ref().unwrap();
        assert_eq!(sale["subtotal"], 1500);
        assert_eq!(sale["tax"], 285);
        assert_eq!(sale["total"], 1785);

        let totals = handle_line(&state, r#"{"command":"get_totals"}"#).await;
        let totals = totals.data.unwrap();
        assert_eq!(totals["revenue"], 1500);
        assert_eq!(totals["cost"], 2000);
        assert_eq!(totals["stockValue"], 1400);
    }

    #[tokio::test]
    async fn test_update_product_over_lines() {
        let state = test_support::state().await;
        handle_line(
            &state,
            r#"{"command":"restock","name":"Widget","quantity":2,"price":500,"unitCost":200}"#,
        )
        .await;

        let response = handle_line(
            &state,
            r#"{"command":"update_product","product":"Widget","name":"Sprocket","price":650}"#,
        )
        .await;
        assert!(response.ok);
        let product = response.data.unwrap();
        assert_eq!(product["name"], "Sprocket");
        assert_eq!(product["price"], 650);
        assert_eq!(product["cost"], 200);
        assert_eq!(product["quantity"], 2);

        let response = handle_line(
            &state,
            r#"{"command":"update_product","product":"Sprocket","price":0}"#,
        )
        .await;
        assert_eq!(response.error.unwrap().code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_command_is_invalid_request() {
        let state = test_support::state().await;

        let response = handle_line(&state, r#"{"command":"refund"}"#).await;
        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);

        let response = handle_line(&state, "not json").await;
        assert_eq!(response.error.unwrap().code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_errors_serialize_without_data() {
        let state = test_support::state().await;

        let response = handle_line(&state, r#"{"command":"commit_sale"}"#).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "EMPTY_BASKET");
        assert!(json.get("data").is_none());
    }
}
