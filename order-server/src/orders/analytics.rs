//! Derived sales aggregates
//!
//! Pure functions over the order list, computed on each admin read. Nothing
//! here is persisted or cached; the order list is the single source of truth.
//! Ties are broken by encounter order: the first dish or customer seen while
//! walking the list wins.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;
use std::collections::HashMap;

use crate::settlement::money::{to_decimal, to_f64};

/// Dish with its total ordered quantity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DishCount {
    pub name: String,
    pub quantity: i64,
}

/// Customer with the highest loyalty balance among those who ordered.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopCustomer {
    pub user_id: String,
    pub name: Option<String>,
    pub points: i64,
}

/// Σ totalAmount over all orders.
pub fn total_revenue(orders: &[Order]) -> f64 {
    let total: Decimal = orders.iter().map(|o| to_decimal(o.total_amount)).sum();
    to_f64(total)
}

/// Item name with the highest Σ quantity across all orders.
pub fn most_ordered_dish(orders: &[Order]) -> Option<DishCount> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    let mut seen: Vec<&str> = Vec::new();

    for order in orders {
        for item in &order.items {
            let entry = totals.entry(item.name.as_str()).or_insert_with(|| {
                seen.push(item.name.as_str());
                0
            });
            *entry += i64::from(item.quantity);
        }
    }

    let mut best: Option<DishCount> = None;
    for name in seen {
        let quantity = totals[name];
        // Strictly greater: on a tie the first-seen dish keeps the spot
        if best.as_ref().is_none_or(|b| quantity > b.quantity) {
            best = Some(DishCount {
                name: name.to_string(),
                quantity,
            });
        }
    }
    best
}

/// Distinct customer (≥ 1 order) with the highest current loyalty balance.
/// `balance_of` is supplied by the caller so this stays a pure aggregate.
pub fn top_customer(orders: &[Order], balance_of: impl Fn(&str) -> i64) -> Option<TopCustomer> {
    let mut seen: Vec<(&str, Option<&str>)> = Vec::new();

    for order in orders {
        if !seen.iter().any(|(id, _)| *id == order.user_id.as_str()) {
            seen.push((order.user_id.as_str(), order.customer_name.as_deref()));
        }
    }

    let mut best: Option<TopCustomer> = None;
    for (user_id, name) in seen {
        let points = balance_of(user_id);
        if best.as_ref().is_none_or(|b| points > b.points) {
            best = Some(TopCustomer {
                user_id: user_id.to_string(),
                name: name.map(|s| s.to_string()),
                points,
            });
        }
    }
    best
}

/// (pending, completed) counts: pending = not yet Delivered.
pub fn fulfillment_counts(orders: &[Order]) -> (usize, usize) {
    let completed = orders.iter().filter(|o| o.status.is_delivered()).count();
    (orders.len() - completed, completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Address, OrderItem, OrderStatus};

    fn order(id: &str, user: &str, items: Vec<(&str, f64, i32)>, total: f64) -> Order {
        Order {
            id: id.to_string(),
            user_id: user.to_string(),
            customer_name: Some(format!("Name of {user}")),
            customer_email: None,
            restaurant_id: Some("r1".to_string()),
            restaurant_name: None,
            items: items
                .into_iter()
                .map(|(name, price, quantity)| OrderItem {
                    name: name.to_string(),
                    price,
                    quantity,
                })
                .collect(),
            total_amount: total,
            address: Address {
                street: "1 High Street".to_string(),
                postcode: "AB1 2CD".to_string(),
                county: "Kent".to_string(),
                country: "UK".to_string(),
            },
            status: OrderStatus::Paid,
            special_instructions: String::new(),
            created_at: 0,
        }
    }

    #[test]
    fn test_total_revenue() {
        let orders = vec![
            order("o1", "u1", vec![("Pizza", 10.0, 2)], 20.0),
            order("o2", "u2", vec![("Sushi", 6.0, 1)], 6.0),
        ];
        assert_eq!(total_revenue(&orders), 26.0);
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_revenue_decimal_accumulation() {
        // 0.1 × 3 orders must not drift
        let orders: Vec<Order> = (0..3)
            .map(|i| order(&format!("o{i}"), "u1", vec![("Tea", 0.1, 1)], 0.1))
            .collect();
        assert_eq!(total_revenue(&orders), 0.3);
    }

    #[test]
    fn test_most_ordered_dish_sums_across_orders() {
        let orders = vec![
            order("o1", "u1", vec![("Pizza", 10.0, 2), ("Sushi", 6.0, 1)], 26.0),
            order("o2", "u2", vec![("Sushi", 6.0, 4)], 24.0),
        ];
        let top = most_ordered_dish(&orders).unwrap();
        assert_eq!(top.name, "Sushi");
        assert_eq!(top.quantity, 5);
    }

    #[test]
    fn test_most_ordered_dish_tie_first_seen_wins() {
        let orders = vec![
            order("o1", "u1", vec![("Pizza", 10.0, 3)], 30.0),
            order("o2", "u2", vec![("Sushi", 6.0, 3)], 18.0),
        ];
        let top = most_ordered_dish(&orders).unwrap();
        assert_eq!(top.name, "Pizza");
    }

    #[test]
    fn test_most_ordered_dish_empty() {
        assert_eq!(most_ordered_dish(&[]), None);
    }

    #[test]
    fn test_top_customer_by_balance() {
        let orders = vec![
            order("o1", "u1", vec![("Pizza", 10.0, 1)], 10.0),
            order("o2", "u2", vec![("Sushi", 6.0, 1)], 6.0),
        ];
        let balances = |user: &str| match user {
            "u1" => 50,
            "u2" => 120,
            _ => 0,
        };
        let top = top_customer(&orders, balances).unwrap();
        assert_eq!(top.user_id, "u2");
        assert_eq!(top.points, 120);
    }

    #[test]
    fn test_top_customer_requires_an_order() {
        // u3 has the biggest balance but never ordered
        let orders = vec![order("o1", "u1", vec![("Pizza", 10.0, 1)], 10.0)];
        let top = top_customer(&orders, |user| if user == "u3" { 999 } else { 10 }).unwrap();
        assert_eq!(top.user_id, "u1");
    }

    #[test]
    fn test_top_customer_tie_first_seen_wins() {
        let orders = vec![
            order("o1", "u1", vec![("Pizza", 10.0, 1)], 10.0),
            order("o2", "u2", vec![("Sushi", 6.0, 1)], 6.0),
        ];
        let top = top_customer(&orders, |_| 42).unwrap();
        assert_eq!(top.user_id, "u1");
    }

    #[test]
    fn test_fulfillment_counts() {
        let mut delivered = order("o1", "u1", vec![("Pizza", 10.0, 1)], 10.0);
        delivered.status = OrderStatus::Delivered;
        let orders = vec![
            delivered,
            order("o2", "u2", vec![("Sushi", 6.0, 1)], 6.0),
            order("o3", "u1", vec![("Chips", 3.0, 1)], 3.0),
        ];
        assert_eq!(fulfillment_counts(&orders), (2, 1));
    }
}
