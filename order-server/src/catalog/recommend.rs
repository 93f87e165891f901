//! Recommendation boundary
//!
//! The scoring heuristic is an opaque collaborator: callers hand it the
//! customer's order history and a restaurant, and get back scored menu items.
//! The default implementation ranks by how often the customer ordered dishes
//! with the same name or category; swapping it out never touches the rest of
//! the system.

use serde::Serialize;
use shared::models::{Order, Restaurant};
use std::collections::HashMap;

/// A suggested menu item with its score.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub price: f64,
    pub score: f64,
}

pub trait Recommender: Send + Sync {
    /// Suggest up to `limit` items from `restaurant` for a customer with the
    /// given order history. An empty history yields no suggestions.
    fn recommend(
        &self,
        past_orders: &[Order],
        restaurant: &Restaurant,
        limit: usize,
    ) -> Vec<Recommendation>;
}

/// Frequency-based scorer: dishes the customer ordered often lift menu items
/// sharing their name or category.
#[derive(Debug, Default, Clone)]
pub struct PopularityRecommender;

impl Recommender for PopularityRecommender {
    fn recommend(
        &self,
        past_orders: &[Order],
        restaurant: &Restaurant,
        limit: usize,
    ) -> Vec<Recommendation> {
        if past_orders.is_empty() {
            return Vec::new();
        }

        let mut frequency: HashMap<String, f64> = HashMap::new();
        for order in past_orders {
            for item in &order.items {
                *frequency.entry(item.name.to_lowercase()).or_insert(0.0) +=
                    f64::from(item.quantity.max(1));
            }
        }

        let mut scored: Vec<Recommendation> = restaurant
            .menu
            .iter()
            .filter_map(|menu_item| {
                let name_key = menu_item.name.to_lowercase();
                let mut score = frequency.get(&name_key).copied().unwrap_or(0.0);

                if let Some(category) = &menu_item.category {
                    let category = category.to_lowercase();
                    score += frequency
                        .iter()
                        .filter(|(dish, _)| category.split(',').any(|c| dish.contains(c.trim())))
                        .map(|(_, count)| count * 0.5)
                        .sum::<f64>();
                }

                (score > 0.0).then(|| Recommendation {
                    name: menu_item.name.clone(),
                    price: menu_item.price,
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }
}
