//! # Terminal State
//!
//! Everything a command can touch, built once at startup.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState<S>                                                           │
//! │  ├── pos: PointOfSale<S>   catalog, basket, sale, ledger, tax          │
//! │  │        └── S = Database in production, MemoryStore in tests        │
//! │  └── config: AppConfig     read-only after startup                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockroom_core::store::Store;
use stockroom_core::PointOfSale;

use crate::config::AppConfig;

#[derive(Debug)]
pub struct AppState<S> {
    pub pos: PointOfSale<S>,
    pub config: AppConfig,
}

impl<S: Store> AppState<S> {
    /// Wraps `store` in a service using the configured cost policy.
    pub fn new(store: S, config: AppConfig) -> Self {
        AppState {
            pos: PointOfSale::new(store).with_cost_policy(config.cost_policy),
            config,
        }
    }
}
