//! Cart validation and grouping
//!
//! A checkout cart may span several restaurants. Valid items are grouped into
//! disjoint per-restaurant buckets; items that fail validation are excluded
//! (never fatal on their own) and reported back so the caller can log them.
//! Buckets keep the order restaurants first appear in the cart.

use shared::models::{CartItem, OrderItem};

use super::money::{self, MAX_PRICE, MAX_QUANTITY, line_total, to_f64};
use rust_decimal::Decimal;

/// The subset of a checkout cart belonging to one restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub restaurant_id: String,
    pub items: Vec<OrderItem>,
    /// round2(Σ price × quantity) over the bucket's items.
    pub total_amount: f64,
}

/// Grouping outcome: buckets plus the items that were dropped, with reasons.
#[derive(Debug, Default)]
pub struct GroupedCart {
    pub buckets: Vec<Bucket>,
    pub dropped: Vec<(CartItem, &'static str)>,
}

impl GroupedCart {
    /// Σ bucket totals, i.e. the pre-discount subtotal.
    pub fn subtotal(&self) -> Decimal {
        self.buckets
            .iter()
            .map(|b| money::to_decimal(b.total_amount))
            .sum()
    }
}

/// Validate a single cart item. The restaurant id is checked separately
/// during grouping.
pub fn validate_cart_item(item: &CartItem) -> Result<(), &'static str> {
    if item.name.trim().is_empty() {
        return Err("item name is empty");
    }
    if !item.price.is_finite() {
        return Err("price is not a finite number");
    }
    if item.price < 0.0 {
        return Err("price is negative");
    }
    if item.price > MAX_PRICE {
        return Err("price exceeds maximum allowed");
    }
    if item.quantity < 1 {
        return Err("quantity must be at least 1");
    }
    if item.quantity > MAX_QUANTITY {
        return Err("quantity exceeds maximum allowed");
    }
    Ok(())
}

/// Group valid cart items by restaurant, in first-seen order.
pub fn group_cart(items: Vec<CartItem>) -> GroupedCart {
    let mut grouped = GroupedCart::default();
    let mut totals: Vec<Decimal> = Vec::new();

    for item in items {
        if let Err(reason) = validate_cart_item(&item) {
            grouped.dropped.push((item, reason));
            continue;
        }
        let Some(restaurant_id) = item.restaurant_id.clone().filter(|id| !id.trim().is_empty())
        else {
            grouped.dropped.push((item, "no resolvable restaurant id"));
            continue;
        };

        let index = match grouped
            .buckets
            .iter()
            .position(|b| b.restaurant_id == restaurant_id)
        {
            Some(index) => index,
            None => {
                grouped.buckets.push(Bucket {
                    restaurant_id,
                    items: Vec::new(),
                    total_amount: 0.0,
                });
                totals.push(Decimal::ZERO);
                grouped.buckets.len() - 1
            }
        };

        totals[index] += line_total(item.price, item.quantity);
        grouped.buckets[index].items.push(OrderItem {
            name: item.name,
            price: item.price,
            quantity: item.quantity,
        });
    }

    for (bucket, total) in grouped.buckets.iter_mut().zip(totals) {
        bucket.total_amount = to_f64(total);
    }
    grouped
}
