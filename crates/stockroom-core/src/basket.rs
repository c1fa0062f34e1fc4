//! # Basket
//!
//! The in-progress sale as a plain value.
//!
//! ## Basket Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Operations                                    │
//! │                                                                         │
//! │  Cashier Action           Service Call            Basket Change         │
//! │  ──────────────           ────────────            ─────────────         │
//! │                                                                         │
//! │  Scan / type name ───────► basket().add() ──────► push or merge line   │
//! │                                                                         │
//! │  Drop a product ─────────► remove_line() ───────► lines.remove(i)      │
//! │                                                                         │
//! │  Cancel sale ────────────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  Preview ────────────────► summary() ───────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Basket` holds no I/O. The service loads it from the [`BasketStore`],
//! applies one change and writes the touched line back inside the same
//! unit of work.
//!
//! [`BasketStore`]: crate::store::BasketStore

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{BasketLine, BasketSummary, Product, ProductId, TaxRate};
use crate::validation::validate_quantity;
use crate::MAX_QUANTITY;

/// The current sale basket.
///
/// ## Invariants
/// - At most one line per product
/// - Every line has `quantity > 0`
/// - Every line has `subtotal == unit_price × quantity`
/// - Lines keep the order in which products first entered the basket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basket {
    lines: Vec<BasketLine>,
}

impl Basket {
    pub fn new() -> Self {
        Basket::default()
    }

    /// Rebuilds a basket from stored lines (already in insertion order).
    pub fn from_lines(lines: Vec<BasketLine>) -> Self {
        Basket { lines }
    }

    /// Adds `quantity` of `product`, merging with an existing line.
    ///
    /// ## Behavior
    /// - Stock check is `product.quantity >= quantity` for this add only;
    ///   nothing is reserved, the commit re-checks the merged quantity
    /// - The unit price is refreshed from `product` on every add and the
    ///   subtotal recomputed over the merged quantity
    /// - `added_at` of an existing line is kept
    /// - Fails with `OutOfRange` if the merged quantity passes
    ///   [`MAX_QUANTITY`] or the basket subtotal could overflow once taxed;
    ///   the basket is left unchanged
    pub fn add(&mut self, product: &Product, quantity: i64, now: DateTime<Utc>) -> CoreResult<&BasketLine> {
        validate_quantity(quantity)?;

        if !product.can_supply(quantity) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity,
                requested: quantity,
            });
        }

        let line = match self.position(product.id) {
            Some(index) => {
                let current = &self.lines[index];
                let merged = current
                    .quantity
                    .checked_add(quantity)
                    .filter(|q| *q <= MAX_QUANTITY)
                    .ok_or_else(|| CoreError::out_of_range("quantity", 1, MAX_QUANTITY))?;
                BasketLine {
                    product_name: product.name.clone(),
                    quantity: merged,
                    unit_price: product.price,
                    subtotal: line_subtotal(product.price, merged)?,
                    ..current.clone()
                }
            }
            None => BasketLine {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity,
                unit_price: product.price,
                subtotal: line_subtotal(product.price, quantity)?,
                added_at: now,
            },
        };

        // Tax is at most 100%, so a subtotal that doubles safely keeps every
        // taxed total in range.
        let basket_subtotal = self
            .lines
            .iter()
            .filter(|l| l.product_id != product.id)
            .try_fold(line.subtotal, |sum, l| sum.checked_add(l.subtotal));
        if basket_subtotal.and_then(|subtotal| subtotal.checked_mul(2)).is_none() {
            return Err(CoreError::out_of_range("subtotal", 0, i64::MAX / 2));
        }

        let index = match self.position(product.id) {
            Some(index) => {
                self.lines[index] = line;
                index
            }
            None => {
                self.lines.push(line);
                self.lines.len() - 1
            }
        };

        Ok(&self.lines[index])
    }

    /// Removes the line for `product_id`, returning it.
    pub fn remove(&mut self, product_id: ProductId) -> Option<BasketLine> {
        let index = self.position(product_id)?;
        Some(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn line(&self, product_id: ProductId) -> Option<&BasketLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn lines(&self) -> &[BasketLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<BasketLine> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ line subtotals, tax-exclusive.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    /// Subtotal plus tax at `rate`.
    ///
    /// Tax is computed once on the subtotal, not per line.
    pub fn total_with_tax(&self, rate: TaxRate) -> Money {
        self.subtotal().with_tax(rate)
    }

    /// Lines plus subtotal, tax and total at `rate`.
    pub fn summary(&self, rate: TaxRate) -> BasketSummary {
        let subtotal = self.subtotal();
        let tax = subtotal.calculate_tax(rate);
        BasketSummary {
            lines: self.lines.clone(),
            subtotal,
            tax,
            total: subtotal + tax,
            tax_rate: rate,
        }
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

fn line_subtotal(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| CoreError::out_of_range("subtotal", 0, i64::MAX))
}

// =============================================================================
// Unit Tests
// =============================================================================
