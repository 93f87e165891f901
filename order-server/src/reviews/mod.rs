//! Dish reviews

mod store;

pub use store::{ReviewError, ReviewStore};
