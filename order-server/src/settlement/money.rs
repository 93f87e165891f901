//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done on `Decimal` and converted back to `f64`
//! only for storage/serialization. Loyalty points convert at a fixed
//! £0.01 per point; point accrual floors to whole currency units.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Fixed redemption rate: one point is worth £0.01 of discount
pub const POINT_VALUE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item (£1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: price × quantity
pub fn line_total(price: f64, quantity: i32) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Discount value of a point count (£0.01 per point)
pub fn points_discount(points: i64) -> Decimal {
    Decimal::from(points) * POINT_VALUE
}

/// Whole currency units of an amount, floored and clamped at zero.
/// One loyalty point is accrued per whole unit invoiced.
pub fn whole_units(amount: Decimal) -> i64 {
    amount.max(Decimal::ZERO).floor().to_i64().unwrap_or(0)
}

/// Amount in minor currency units (pence), as charged through the gateway.
pub fn minor_units(amount: Decimal) -> i64 {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}
