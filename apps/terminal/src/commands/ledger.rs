//! Totals ledger report.

use crate::error::ApiError;
use crate::state::AppState;
use stockroom_core::store::Store;
use stockroom_core::TotalsReport;

/// Revenue, cost, profit, margin and current stock value.
pub async fn get_totals<S: Store>(state: &AppState<S>) -> Result<TotalsReport, ApiError> {
    Ok(state.pos.ledger().report().await?)
}
