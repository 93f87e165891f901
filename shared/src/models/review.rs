//! Dish review model

use serde::{Deserialize, Serialize};

/// Review entity, attached to a restaurant and naming the dish reviewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub reviewer_name: Option<String>,
    pub dish: String,
    /// 1..=5
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub dish: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}
