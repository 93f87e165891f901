//! Order store, status tracking and derived analytics
//!
//! Orders are created exclusively by the settlement engine; after creation the
//! only mutable field is `status`, owned by the [`tracker::OrderTracker`].

pub mod analytics;
mod store;
mod tracker;

pub use store::OrderStore;
pub use tracker::{OrderTracker, TrackerError};
