//! # Repository Module
//!
//! SQL for each table, one repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories inside a transaction                    │
//! │                                                                         │
//! │  PointOfSale (stockroom-core)                                          │
//! │       │                                                                 │
//! │       │  work.product_by_name("Widget")                                │
//! │       ▼                                                                 │
//! │  SqliteWork (store.rs) ── owns sqlx::Transaction                       │
//! │       │                                                                 │
//! │       │  ProductRepository::new(&mut *tx).get_by_name(..)              │
//! │       ▼                                                                 │
//! │  ProductRepository / BasketRepository / LedgerRepository /             │
//! │  SettingsRepository                                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories borrow a `SqliteConnection`, so the same code runs against a
//! pooled connection or an open transaction.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Product catalog rows
//! - [`BasketRepository`] - Current sale lines
//! - [`LedgerRepository`] - Revenue and cost totals
//! - [`SettingsRepository`] - Tax rate and other settings

pub mod basket;
pub mod ledger;
pub mod product;
pub mod settings;

pub use basket::BasketRepository;
pub use ledger::LedgerRepository;
pub use product::ProductRepository;
pub use settings::SettingsRepository;
