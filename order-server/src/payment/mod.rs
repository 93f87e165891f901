//! Payment Gateway Adapter
//!
//! External collaborator boundary for card payments. The server creates a
//! payment intent (returning a client secret the browser confirms directly
//! with the gateway) and later verifies the captured charge before any order
//! is created. Anything other than an explicit `succeeded` status is a hard
//! stop.

mod gateway;
mod mock;
mod stripe;

pub use gateway::{GatewayError, IntentStatus, PaymentGateway, PaymentIntent};
pub use mock::MockGateway;
pub use stripe::StripeGateway;
