//! # Inventory Math
//!
//! Pure restock and stock-decrement rules. The catalog service feeds these
//! with what it read from the store and writes back what they return.
//!
//! ## Restock
//! ```text
//! restock("Widget", qty, price, cost_or_margin)
//!      │
//!      ├── margin? ── cost = price / (1 + margin)
//!      │
//!      ├── unseen name ─────► new product { qty, price, cost }
//!      │
//!      └── existing product ─► quantity += qty
//!                              price     = price
//!                              cost      = policy(old, new)
//!
//! ledger cost += qty × cost   (the restock's cost, not the blended one)
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CostInput, CostPolicy, Product};
use crate::validation::{validate_cost, validate_margin};
use crate::MAX_QUANTITY;

impl CostInput {
    /// Resolves the unit cost for a restock at `price`.
    ///
    /// A margin-derived cost must still be positive after rounding.
    pub fn resolve(&self, price: Money) -> CoreResult<Money> {
        let cost = match *self {
            CostInput::UnitCost(cost) => cost,
            CostInput::Margin(margin) => {
                validate_margin(margin)?;
                price.remove_markup(margin)
            }
        };
        validate_cost(cost)?;
        Ok(cost)
    }
}

impl CostPolicy {
    /// Unit cost after adding `added_qty` units at `added_cost` to
    /// `on_hand` units carried at `current_cost`.
    ///
    /// The weighted average rounds half-up to the cent. With nothing on
    /// hand it is simply `added_cost`.
    pub fn blend(&self, on_hand: i64, current_cost: Money, added_qty: i64, added_cost: Money) -> Money {
        match self {
            CostPolicy::Overwrite => added_cost,
            CostPolicy::WeightedAverage => {
                let on_hand = on_hand.max(0) as i128;
                let total_qty = on_hand + added_qty as i128;
                if on_hand == 0 || total_qty <= 0 {
                    return added_cost;
                }
                let value = on_hand * current_cost.cents() as i128
                    + added_qty as i128 * added_cost.cents() as i128;
                Money::from_cents(((value + total_qty / 2) / total_qty) as i64)
            }
        }
    }
}

/// What a restock writes: the product's new state and the ledger charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestockPlan {
    pub quantity: i64,
    pub price: Money,
    pub cost: Money,

    /// Amount added to the ledger's lifetime cost.
    pub ledger_cost: Money,
}

/// Plans a restock of `quantity` units at `price` and `unit_cost`.
///
/// Inputs are expected to be validated already. Fails with `OutOfRange`
/// when the stock on hand would pass [`MAX_QUANTITY`] or the ledger
/// charge leaves the i64 range.
pub fn plan_restock(
    existing: Option<&Product>,
    quantity: i64,
    price: Money,
    unit_cost: Money,
    policy: CostPolicy,
) -> CoreResult<RestockPlan> {
    let ledger_cost = unit_cost
        .checked_mul(quantity)
        .ok_or_else(|| CoreError::out_of_range("cost", 0, i64::MAX))?;

    let on_hand = existing.map_or(0, |p| p.quantity);
    let total = on_hand
        .checked_add(quantity)
        .filter(|total| *total <= MAX_QUANTITY)
        .ok_or_else(|| CoreError::out_of_range("quantity", 1, MAX_QUANTITY))?;

    let cost = match existing {
        None => unit_cost,
        Some(product) => policy.blend(product.quantity, product.cost, quantity, unit_cost),
    };

    Ok(RestockPlan {
        quantity: total,
        price,
        cost,
        ledger_cost,
    })
}

/// Returns the stock left after taking `quantity` units of `product`.
pub fn remaining_after(product: &Product, quantity: i64) -> CoreResult<i64> {
    if !product.can_supply(quantity) {
        return Err(CoreError::InsufficientStock {
            product: product.name.clone(),
            available: product.quantity,
            requested: quantity,
        });
    }
    Ok(product.quantity - quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================
