//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Menu entry (read-mostly catalog data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    pub created_at: i64,
}

/// Create restaurant payload (admin seeding)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}
