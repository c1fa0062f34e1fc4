//! # stockroom-core: Inventory and Ledger Core for Stockroom
//!
//! This crate is the **heart** of Stockroom. It owns every rule about how
//! products, the current sale basket and the totals ledger change together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI / Terminal (external caller)                 │   │
//! │  │    Restock dialog ──► Basket view ──► Commit ──► Totals dialog  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockroom-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  service  │  │  basket   │  │ inventory │  │   money   │  │   │
//! │  │   │PointOfSale│  │  Basket   │  │  restock  │  │   Money   │  │   │
//! │  │   │  commit   │  │  lines    │  │   math    │  │  tax math │  │   │
//! │  │   └─────┬─────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │         │ store ports (ProductStore, BasketStore, ...)         │   │
//! │  │         ├──────────────► memory::MemoryStore                   │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │                                                            │
//! │  ┌─────────▼───────────────────────────────────────────────────────┐   │
//! │  │                  stockroom-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, BasketLine, CommittedSale, Totals)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`basket`] - The basket as a plain value
//! - [`inventory`] - Restock and stock-decrement math
//! - [`store`] - Storage ports and the unit of work
//! - [`memory`] - In-process store
//! - [`service`] - `PointOfSale`, the operations callers use
//!
//! ## Design Principles
//!
//! 1. **No I/O**: the core talks to storage only through the traits in [`store`]
//! 2. **Integer Money**: all monetary values are cents (i64), rates are basis points
//! 3. **All or nothing**: every mutation is one unit of work under one writer lock
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::money::Money;
//! use stockroom_core::types::TaxRate;
//!
//! let subtotal = Money::from_cents(10_000); // $100.00
//! let total = subtotal.with_tax(TaxRate::default_tax());
//!
//! assert_eq!(total.cents(), 11_900); // $119.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod error;
pub mod inventory;
pub mod memory;
pub mod money;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockroom_core::Money` instead of
// `use stockroom_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use service::{Catalog, CurrentSale, Ledger, PointOfSale, TaxConfig};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax rate of a fresh store, in basis points (19%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1900;

/// Longest product name accepted, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Largest restock margin accepted, in basis points (1000%).
pub const MAX_MARGIN_BPS: u32 = 100_000;

/// Largest quantity accepted per request, and largest stock on hand.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price or unit cost accepted, in cents ($10,000,000.00).
pub const MAX_UNIT_AMOUNT_CENTS: i64 = 1_000_000_000;
