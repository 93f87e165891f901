//! Restaurant catalog
//!
//! Read-mostly store of restaurants and menus. Settlement only touches it to
//! resolve display names; prices on orders are snapshots of whatever the cart
//! carried, so later menu edits never change past orders.

mod recommend;
mod store;

pub use recommend::{PopularityRecommender, Recommendation, Recommender};
pub use store::CatalogStore;
