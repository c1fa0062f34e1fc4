//! Tax rate commands.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::TaxRate;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponse {
    pub rate_bps: u32,
    pub percent: f64,
}

impl From<TaxRate> for TaxResponse {
    fn from(rate: TaxRate) -> Self {
        TaxResponse {
            rate_bps: rate.bps(),
            percent: rate.percentage(),
        }
    }
}

pub async fn get_tax<S: Store>(state: &AppState<S>) -> Result<TaxResponse, ApiError> {
    Ok(state.pos.tax().rate().await?.into())
}

/// Sets the rate from a decimal percentage in `0..=100`.
pub async fn set_tax<S: Store>(state: &AppState<S>, percent: f64) -> Result<TaxResponse, ApiError> {
    debug!(percent, "set_tax command");
    Ok(state.pos.tax().set_percent(percent).await?.into())
}
