//! Shared types for the food ordering platform
//!
//! Domain models used across the server and tooling: orders, cart payloads,
//! restaurants, reviews and loyalty accounts, plus small id/time utilities.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
