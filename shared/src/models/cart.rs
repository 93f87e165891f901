//! Cart payload
//!
//! Transient, client-supplied. Older clients sent `qty` / `restaurant`
//! instead of the canonical field names; the aliases are normalized here at
//! the deserialization edge so the settlement engine only ever sees one shape.

use serde::{Deserialize, Serialize};

/// One cart line as submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    #[serde(alias = "qty")]
    pub quantity: i32,
    #[serde(default, alias = "restaurant")]
    pub restaurant_id: Option<String>,
}
