//! Money calculation utilities using rust_decimal for precision
//!
//! Totals are computed with `Decimal` and converted back to `f64` for
//! storage/serialization.

use crate::orders::traits::OrderError;
use rust_decimal::prelude::*;
use shared::order::OrderItemInput;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 999;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate one line of a new order
pub fn validate_item_input(index: usize, item: &OrderItemInput) -> Result<(), OrderError> {
    if item.dish_id.trim().is_empty() {
        return Err(OrderError::InvalidOperation(format!(
            "item {} has an empty dish_id",
            index
        )));
    }
    if !item.unit_price.is_finite() || item.unit_price < 0.0 {
        return Err(OrderError::InvalidOperation(format!(
            "item {} unit_price must be a non-negative finite number, got {}",
            index, item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(OrderError::InvalidOperation(format!(
            "item {} unit_price exceeds maximum allowed ({}), got {}",
            index, MAX_PRICE, item.unit_price
        )));
    }
    if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidOperation(format!(
            "item {} quantity must be between 1 and {}, got {}",
            index, MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

/// Σ unit_price × quantity, rounded half-up to cents
pub fn order_total(items: &[OrderItemInput]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|item| to_decimal(item.unit_price) * Decimal::from(item.quantity))
        .sum();
    to_f64(total)
}
