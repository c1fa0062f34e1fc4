//! # stockroom-db: Database Layer for Stockroom
//!
//! SQLite persistence for the catalog, the current basket, the totals
//! ledger and settings. Plugs into `stockroom-core` through its store ports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Terminal command (commit_sale)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PointOfSale<Database> (stockroom-core)                                │
//! │       │  Store::begin()                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ product.rs    │    │  (embedded)  │  │   │
//! │  │   │               │    │ basket.rs     │    │              │  │   │
//! │  │   │ SqlitePool    │    │ ledger.rs     │    │ 001_init.sql │  │   │
//! │  │   │ SqliteWork    │◄───│ settings.rs   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <config dir>/stockroom/stockroom.db                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL per table
//! - [`store`] - Transaction-backed unit of work
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_core::PointOfSale;
//! use stockroom_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/stockroom.db")).await?;
//! let pos = PointOfSale::new(db);
//!
//! let products = pos.catalog().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, IN_MEMORY_PATH};
pub use store::SqliteWork;
