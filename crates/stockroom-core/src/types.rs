//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   BasketLine    │   │  CommittedSale  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  product_id     │   │  subtotal       │       │
//! │  │  name (unique)  │   │  quantity       │   │  tax            │       │
//! │  │  quantity       │   │  unit_price     │   │  total          │       │
//! │  │  price, cost    │   │  subtotal       │   │  line_count     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Percentage    │   │     Totals      │   │   CostPolicy    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  revenue        │   │  WeightedAverage│       │
//! │  │  1900 = 19%     │   │  cost           │   │  Overwrite      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Products carry a surrogate `id` used by basket lines and a unique,
//! human-facing `name` used by cashiers. [`ProductKey`] accepts either.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_TAX_RATE_BPS;

// =============================================================================
// Percentages
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// Used for the tax rate and for restock margins. 1900 bps = 19%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

/// The single flat tax rate applied to sale subtotals.
pub type TaxRate = Percentage;

impl Percentage {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Converts a decimal percentage (`19.0`) to basis points.
    ///
    /// Callers are expected to have range-checked the value; see
    /// [`crate::validation::percentage_from_decimal`].
    pub fn from_percentage(pct: f64) -> Self {
        Percentage((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The tax rate a fresh store starts with (19%).
    #[inline]
    pub const fn default_tax() -> Self {
        Percentage(DEFAULT_TAX_RATE_BPS)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Product
// =============================================================================

/// Surrogate product identifier.
pub type ProductId = i64;

/// A product in the catalog.
///
/// ## Invariants
/// - `name` is unique across the catalog
/// - `quantity >= 0` at rest
/// - `price > 0`, `cost > 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    /// Display name, also the business key.
    pub name: String,

    /// Units on hand.
    pub quantity: i64,

    /// Sale price per unit.
    pub price: Money,

    /// Unit cost, either given on restock or derived from a margin.
    pub cost: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Value of the units on hand at cost, clamped to the i64 range.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.cost.saturating_mul(self.quantity)
    }
}

/// Fields needed to create a product; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: Money,
    pub cost: Money,
}

/// Looks a product up by id or by name.
///
/// On the wire a JSON number is an id and a JSON string is a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ProductKey {
    Id(ProductId),
    Name(String),
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductKey::Id(id) => write!(f, "#{}", id),
            ProductKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<ProductId> for ProductKey {
    fn from(id: ProductId) -> Self {
        ProductKey::Id(id)
    }
}

impl From<&str> for ProductKey {
    fn from(name: &str) -> Self {
        ProductKey::Name(name.to_string())
    }
}

impl From<String> for ProductKey {
    fn from(name: String) -> Self {
        ProductKey::Name(name)
    }
}

/// Changes to a product's descriptive fields. `None` leaves a field as is.
///
/// Stock and the ledger only move through restocks and sales, so the
/// quantity is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductEdit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub cost: Option<Money>,
}

impl ProductEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.cost.is_none()
    }
}

// =============================================================================
// Restock Inputs
// =============================================================================

/// How a restock states the unit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum CostInput {
    /// Unit cost given directly.
    UnitCost(Money),

    /// Markup over cost; cost is `price / (1 + margin)`.
    Margin(Percentage),
}

/// What happens to a product's unit cost when it is restocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CostPolicy {
    /// `(old_qty*old_cost + qty*cost) / (old_qty + qty)`
    #[default]
    WeightedAverage,

    /// The newest restock's cost replaces the old one.
    Overwrite,
}

impl FromStr for CostPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weighted_average" | "average" => Ok(CostPolicy::WeightedAverage),
            "overwrite" => Ok(CostPolicy::Overwrite),
            other => Err(format!("unknown cost policy '{}'", other)),
        }
    }
}

impl fmt::Display for CostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostPolicy::WeightedAverage => f.write_str("weighted_average"),
            CostPolicy::Overwrite => f.write_str("overwrite"),
        }
    }
}

// =============================================================================
// Basket
// =============================================================================

/// One product's aggregated presence in the current sale.
///
/// `unit_price` is a copy of the catalog price taken at the latest add;
/// later catalog price changes do not reach it until the product is
/// added again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketLine {
    pub product_id: ProductId,

    /// Product name at the latest add (display only).
    pub product_name: String,

    pub quantity: i64,

    pub unit_price: Money,

    /// Always `unit_price × quantity`.
    pub subtotal: Money,

    /// When the product first entered the basket.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

/// Basket preview: lines plus tax-inclusive totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketSummary {
    pub lines: Vec<BasketLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub tax_rate: TaxRate,
}

// =============================================================================
// Committed Sale
// =============================================================================

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommittedSale {
    /// Σ line subtotals, tax-exclusive. This is what the ledger records.
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub line_count: usize,
    pub tax_rate: TaxRate,

    /// The lines as they were committed (receipt data).
    pub lines: Vec<BasketLine>,

    #[ts(as = "String")]
    pub committed_at: DateTime<Utc>,
}

// =============================================================================
// Ledger
// =============================================================================

/// Lifetime revenue and cost-of-goods accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    /// Tax-exclusive revenue from committed sales.
    pub revenue: Money,

    /// Σ restock quantity × unit cost.
    pub cost: Money,
}

impl Totals {
    #[inline]
    pub fn profit(&self) -> Money {
        self.revenue - self.cost
    }

    /// `profit / revenue * 100`, or 0 before the first sale.
    pub fn margin_percent(&self) -> f64 {
        if !self.revenue.is_positive() {
            return 0.0;
        }
        self.profit().cents() as f64 / self.revenue.cents() as f64 * 100.0
    }
}

/// The totals dialog: ledger figures plus the value of stock on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TotalsReport {
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
    pub margin_percent: f64,
    pub stock_value: Money,
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
