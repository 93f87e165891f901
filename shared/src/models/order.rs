//! Order Model
//!
//! Orders are snapshots: item names/prices, the delivery address and the
//! customer display fields are captured at settlement time and never follow
//! later catalog or profile edits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfillment stage of a single restaurant's order.
///
/// The wire strings are load-bearing: existing clients match on the exact
/// casing and spacing, including `"Out for Delivery"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Paid,
    Preparing,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// Position in the forward fulfillment ordering (Paid → Delivered).
    pub fn rank(self) -> u8 {
        match self {
            OrderStatus::Paid => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::OutForDelivery => 2,
            OrderStatus::Delivered => 3,
        }
    }

    /// Delivered orders count as completed; everything else is pending.
    pub fn is_delivered(self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Paid => "Paid",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery address snapshot. All four fields are required at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub postcode: String,
    pub county: String,
    pub country: String,
}

impl Address {
    /// A complete address has no blank fields.
    pub fn is_complete(&self) -> bool {
        ![&self.street, &self.postcode, &self.county, &self.country]
            .iter()
            .any(|f| f.trim().is_empty())
    }
}

/// Item snapshot inside an order (not a reference into the catalog).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Display snapshot taken from the verified identity at settlement.
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
    pub items: Vec<OrderItem>,
    /// Sum of `price * quantity` over `items`, rounded to 2 decimals.
    pub total_amount: f64,
    pub address: Address,
    pub status: OrderStatus,
    #[serde(default)]
    pub special_instructions: String,
    pub created_at: i64,
}
