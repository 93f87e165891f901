//! Domain models

mod cart;
mod loyalty;
mod order;
mod restaurant;
mod review;

pub use cart::CartItem;
pub use loyalty::LoyaltyAccount;
pub use order::{Address, Order, OrderItem, OrderStatus};
pub use restaurant::{MenuItem, Restaurant, RestaurantCreate};
pub use review::{Review, ReviewCreate};
